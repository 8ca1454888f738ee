use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy)]
pub enum MockMode {
    /// One A record with the given address for whatever was asked.
    Answer(Ipv4Addr),
    /// REFUSED with no answers.
    Refuse,
    /// Reads queries but never replies.
    Silent,
    /// One CNAME record pointing at the given name.
    Alias(&'static str),
}

/// Stub upstream resolver on an ephemeral loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(mode: MockMode) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_mock_response(&buf[..len], mode) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }

    fn build_mock_response(query: &[u8], mode: MockMode) -> Option<Vec<u8>> {
        if query.len() < 12 {
            return None;
        }

        let (rcode, answer) = match mode {
            MockMode::Silent => return None,
            MockMode::Refuse => (0x05, None),
            MockMode::Answer(ip) => (0x00, Some((0x01, ip.octets().to_vec()))),
            MockMode::Alias(target) => (0x00, Some((0x05, encode_name(target)))),
        };

        let mut response = Vec::with_capacity(512);

        // id, QR|RD, RA|rcode, qdcount
        response.extend_from_slice(&query[0..2]);
        response.push(0x81);
        response.push(0x80 | rcode);
        response.extend_from_slice(&query[4..6]);

        // ancount, nscount, arcount
        response.extend_from_slice(&[0x00, if answer.is_some() { 0x01 } else { 0x00 }]);
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&query[12..]);

        if let Some((record_type, rdata)) = answer {
            response.extend_from_slice(&[
                0xc0, 0x0c, // pointer to the question name
                0x00, record_type,
                0x00, 0x01, // IN
                0x00, 0x00, 0x00, 0x3c, // TTL 60
            ]);
            response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            response.extend_from_slice(&rdata);
        }

        Some(response)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len() + 2);
    for label in name.trim_end_matches('.').split('.') {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}
