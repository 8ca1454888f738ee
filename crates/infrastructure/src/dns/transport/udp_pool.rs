use crossbeam_queue::ArrayQueue;
use reflector_dns_domain::DomainError;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::UdpSocket;
use tracing::{debug, info};

/// A connected datagram socket to the upstream resolver. Owned by the pool
/// while idle, by exactly one worker while borrowed.
pub struct UpstreamConnection {
    socket: UdpSocket,
}

impl UpstreamConnection {
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }
}

/// Pool of reusable connections to the single configured upstream resolver.
///
/// Connections are created lazily on a pool miss. A connection released as
/// unhealthy is closed rather than returned, since a timed-out datagram
/// exchange can leave a late reply queued on the socket.
pub struct UpstreamPool {
    server: SocketAddr,
    idle: ArrayQueue<UpstreamConnection>,
    total_created: AtomicU64,
    total_reused: AtomicU64,
    total_discarded: AtomicU64,
}

impl UpstreamPool {
    pub fn new(server: SocketAddr, max_idle: usize) -> Self {
        info!(server = %server, max_idle, "Initializing upstream connection pool");

        Self {
            server,
            idle: ArrayQueue::new(max_idle.max(1)),
            total_created: AtomicU64::new(0),
            total_reused: AtomicU64::new(0),
            total_discarded: AtomicU64::new(0),
        }
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// Borrows an idle connection or opens a new one.
    pub async fn acquire(&self) -> Result<UpstreamConnection, DomainError> {
        if let Some(connection) = self.idle.pop() {
            self.total_reused.fetch_add(1, Ordering::Relaxed);
            return Ok(connection);
        }

        let socket = self.create_socket().await.map_err(|e| {
            DomainError::UpstreamUnavailable(format!(
                "Failed to open socket to {}: {}",
                self.server, e
            ))
        })?;
        self.total_created.fetch_add(1, Ordering::Relaxed);

        debug!(server = %self.server, "Created upstream connection");
        Ok(UpstreamConnection { socket })
    }

    /// Hands a connection back. Unhealthy connections, and any beyond the
    /// idle bound, are closed.
    pub fn release(&self, connection: UpstreamConnection, healthy: bool) {
        if !healthy {
            self.total_discarded.fetch_add(1, Ordering::Relaxed);
            debug!(server = %self.server, "Discarding unhealthy upstream connection");
            return;
        }

        if self.idle.push(connection).is_err() {
            debug!(server = %self.server, "Pool full, closing upstream connection");
        }
    }

    async fn create_socket(&self) -> std::io::Result<UdpSocket> {
        let (domain, bind_addr) = if self.server.is_ipv4() {
            (
                Domain::IPV4,
                SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            )
        } else {
            (
                Domain::IPV6,
                SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
            )
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_recv_buffer_size(256 * 1024)?;
        socket.set_send_buffer_size(128 * 1024)?;
        socket.bind(&bind_addr.into())?;
        socket.set_nonblocking(true)?;

        let std_socket: std::net::UdpSocket = socket.into();
        let socket = UdpSocket::from_std(std_socket)?;
        socket.connect(self.server).await?;
        Ok(socket)
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.total_created.load(Ordering::Relaxed),
            reused: self.total_reused.load(Ordering::Relaxed),
            discarded: self.total_discarded.load(Ordering::Relaxed),
            idle: self.idle.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub created: u64,
    pub reused: u64,
    pub discarded: u64,
    pub idle: usize,
}
