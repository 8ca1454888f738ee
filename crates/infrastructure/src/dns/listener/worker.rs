use crate::dns::buffer_pool::{BufferPool, PooledBuffer};
use crate::dns::processor::QueryProcessor;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// A received datagram travelling from a reader to exactly one processor.
pub struct InboundRequest {
    pub buffer: PooledBuffer,
    pub peer: SocketAddr,
}

/// Receive errors that concern a single datagram rather than the socket.
fn is_per_packet(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

/// Receives datagrams and enqueues them until shutdown or a fatal socket
/// error. Blocks on a full queue, pushing backpressure onto the socket.
pub(super) async fn run_reader(
    worker_id: usize,
    socket: Arc<UdpSocket>,
    buffers: Arc<BufferPool>,
    queue: flume::Sender<InboundRequest>,
    shutdown: CancellationToken,
) {
    debug!(worker = worker_id, "Reader started");

    loop {
        let mut buffer = buffers.acquire();

        let received = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = socket.recv_from(&mut buffer) => result,
        };

        let (len, peer) = match received {
            Ok(received) => received,
            Err(e) if is_per_packet(&e) => {
                debug!(worker = worker_id, error = %e, "Transient receive error");
                continue;
            }
            Err(e) => {
                error!(worker = worker_id, error = %e, "Listening socket failed, stopping");
                shutdown.cancel();
                break;
            }
        };
        buffer.set_len(len);

        let request = InboundRequest { buffer, peer };
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!(
                    worker = worker_id,
                    client = %peer,
                    "Discarding request received during shutdown"
                );
                break;
            }
            sent = queue.send_async(request) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    debug!(worker = worker_id, "Reader stopped");
}

/// Drains the queue, handling each request as its own task. At most
/// `max_in_flight` requests run at once per processor; when the bound is
/// reached this processor stalls while the others keep going. Returns once
/// the queue is closed and every in-flight request has finished.
pub(super) async fn run_processor(
    worker_id: usize,
    socket: Arc<UdpSocket>,
    processor: Arc<QueryProcessor>,
    queue: flume::Receiver<InboundRequest>,
    max_in_flight: usize,
) {
    debug!(worker = worker_id, "Processor started");

    let permits = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut in_flight: JoinSet<()> = JoinSet::new();

    while let Ok(request) = queue.recv_async().await {
        reap_finished(worker_id, &mut in_flight);

        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };

        let socket = Arc::clone(&socket);
        let processor = Arc::clone(&processor);
        in_flight.spawn(async move {
            let _permit = permit;
            handle_request(worker_id, &socket, &processor, request).await;
        });
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            log_failed_task(worker_id, &e);
        }
    }

    debug!(worker = worker_id, "Processor stopped");
}

/// Collects request tasks that already finished. Returns how many failed.
fn reap_finished(worker_id: usize, in_flight: &mut JoinSet<()>) -> usize {
    let mut failed = 0;
    while let Some(joined) = in_flight.try_join_next() {
        if let Err(e) = joined {
            log_failed_task(worker_id, &e);
            failed += 1;
        }
    }
    failed
}

fn log_failed_task(worker_id: usize, error: &JoinError) {
    error!(worker = worker_id, error = %error, "Request task panicked");
}

async fn handle_request(
    worker_id: usize,
    socket: &UdpSocket,
    processor: &QueryProcessor,
    request: InboundRequest,
) {
    let InboundRequest { buffer, peer } = request;

    let Some(reply) = processor.process(buffer.filled()).await else {
        return;
    };

    if let Err(e) = socket.send_to(&reply, peer).await {
        warn!(worker = worker_id, client = %peer, error = %e, "Failed to send reply");
    }
    // `buffer` returns to the pool here, after its last read.
}
