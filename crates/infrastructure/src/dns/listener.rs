//! The listening socket and the worker pool draining it.
//!
//! Each of the N workers is a reader/processor pair joined by one shared
//! bounded queue of capacity `N * queue_factor`. Readers never wait on the
//! upstream; processors never wait on the socket's receive side.

mod socket;
mod worker;

pub use worker::InboundRequest;

use super::buffer_pool::BufferPool;
use super::processor::QueryProcessor;
use reflector_dns_domain::config::WorkersConfig;
use reflector_dns_domain::{DomainError, ReflectorSettings};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Queue and buffer sizing for the worker pool.
#[derive(Debug, Clone, Copy)]
pub struct WorkerOptions {
    pub queue_factor: usize,
    pub buffer_size: usize,
    pub max_in_flight: usize,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self::from(&WorkersConfig::default())
    }
}

impl From<&WorkersConfig> for WorkerOptions {
    fn from(config: &WorkersConfig) -> Self {
        Self {
            queue_factor: config.queue_factor,
            buffer_size: config.buffer_size,
            max_in_flight: config.max_in_flight,
        }
    }
}

pub struct Listener {
    socket: Option<Arc<UdpSocket>>,
    local_addr: SocketAddr,
    worker_count: usize,
    options: WorkerOptions,
    processor: Arc<QueryProcessor>,
    buffers: Arc<BufferPool>,
    shutdown: CancellationToken,
    workers: Option<JoinSet<()>>,
}

impl Listener {
    /// Validates the settings and binds the socket. Nothing is spawned yet.
    pub fn bind(
        settings: &ReflectorSettings,
        options: WorkerOptions,
        processor: Arc<QueryProcessor>,
    ) -> Result<Self, DomainError> {
        if !settings.network.eq_ignore_ascii_case("udp") {
            return Err(DomainError::ConfigurationInvalid(format!(
                "Unsupported network '{}': only udp is supported",
                settings.network
            )));
        }

        let socket_addr: SocketAddr = settings.address.parse().map_err(|e| {
            DomainError::ConfigurationInvalid(format!(
                "Invalid listen address '{}': {}",
                settings.address, e
            ))
        })?;

        let socket = socket::create_udp_socket(socket_addr).map_err(|e| {
            DomainError::SocketFatal(format!("Failed to bind {}: {}", socket_addr, e))
        })?;
        let local_addr = socket
            .local_addr()
            .map_err(|e| DomainError::SocketFatal(e.to_string()))?;

        let worker_count = settings.worker_count.max(1);
        let queue_factor = options.queue_factor.max(1);
        let buffers = BufferPool::new(worker_count * (queue_factor + 1), options.buffer_size);

        info!(bind_address = %local_addr, worker_count, "Listener bound");

        Ok(Self {
            socket: Some(Arc::new(socket)),
            local_addr,
            worker_count,
            options: WorkerOptions {
                queue_factor,
                ..options
            },
            processor,
            buffers: Arc::new(buffers),
            shutdown: CancellationToken::new(),
            workers: None,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn queue_capacity(&self) -> usize {
        self.worker_count * self.options.queue_factor
    }

    pub fn is_serving(&self) -> bool {
        self.workers.is_some()
    }

    /// Cancelled when shutdown begins, either on request or because the
    /// socket failed.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Spawns the workers and returns immediately.
    pub fn listen_and_serve(&mut self) -> Result<(), DomainError> {
        if self.workers.is_some() {
            return Ok(());
        }
        let socket = self
            .socket
            .clone()
            .ok_or_else(|| DomainError::SocketFatal("listener is shut down".to_string()))?;

        let (sender, receiver) = flume::bounded(self.queue_capacity());
        let mut workers = JoinSet::new();

        for worker_id in 0..self.worker_count {
            workers.spawn(worker::run_reader(
                worker_id,
                Arc::clone(&socket),
                Arc::clone(&self.buffers),
                sender.clone(),
                self.shutdown.clone(),
            ));
            workers.spawn(worker::run_processor(
                worker_id,
                Arc::clone(&socket),
                Arc::clone(&self.processor),
                receiver.clone(),
                self.options.max_in_flight,
            ));
        }

        info!(
            "DNS reflector ready on {} with {} workers, queue capacity {}",
            self.local_addr,
            self.worker_count,
            self.queue_capacity()
        );

        self.workers = Some(workers);
        Ok(())
    }

    /// Stops the readers, lets the processors finish what is already queued,
    /// joins every worker and closes the socket.
    pub async fn shutdown(&mut self) {
        self.shutdown.cancel();

        if let Some(mut workers) = self.workers.take() {
            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    error!(error = %e, "Worker task failed");
                }
            }
        }

        self.socket = None;
        info!(bind_address = %self.local_addr, "Listener shut down");
    }
}
