//! Forwarding over pooled UDP connections (RFC 1035 §4.2.1).
//!
//! Messages are sent as-is, no framing. A reply whose transaction id does not
//! match the query is treated as a desynchronized socket.

use super::udp_pool::{UpstreamConnection, UpstreamPool};
use async_trait::async_trait;
use reflector_dns_application::ports::UpstreamClient;
use reflector_dns_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Largest reply accepted from upstream (EDNS(0) sized).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct PooledUpstreamClient {
    pool: Arc<UpstreamPool>,
}

impl PooledUpstreamClient {
    pub fn new(pool: Arc<UpstreamPool>) -> Self {
        Self { pool }
    }

    async fn exchange(
        &self,
        connection: &UpstreamConnection,
        query: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        let socket = connection.socket();
        let server = self.pool.server();

        socket.send(query).await.map_err(|e| {
            DomainError::UpstreamUnavailable(format!("Failed to send query to {}: {}", server, e))
        })?;

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let received = socket.recv(&mut recv_buf).await.map_err(|e| {
            DomainError::UpstreamUnavailable(format!(
                "Failed to receive reply from {}: {}",
                server, e
            ))
        })?;
        recv_buf.truncate(received);

        if query.len() >= 2 && (received < 2 || recv_buf[..2] != query[..2]) {
            return Err(DomainError::UpstreamUnavailable(format!(
                "Reply from {} does not match query transaction id",
                server
            )));
        }

        debug!(server = %server, bytes_received = received, "Upstream reply received");
        Ok(recv_buf)
    }
}

#[async_trait]
impl UpstreamClient for PooledUpstreamClient {
    async fn forward(&self, query: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let connection = self.pool.acquire().await?;

        let outcome = match tokio::time::timeout(timeout, self.exchange(&connection, query)).await
        {
            Ok(result) => result,
            Err(_) => Err(DomainError::UpstreamTimeout {
                server: self.pool.server().to_string(),
            }),
        };

        self.pool.release(connection, outcome.is_ok());
        outcome
    }

    fn upstream(&self) -> String {
        self.pool.server().to_string()
    }
}
