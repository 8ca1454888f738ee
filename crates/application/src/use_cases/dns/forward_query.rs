use crate::ports::UpstreamClient;
use reflector_dns_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Forwards a raw query upstream, retrying transient failures up to a fixed
/// number of attempts, each bounded by its own timeout.
pub struct ForwardQueryUseCase {
    upstream: Arc<dyn UpstreamClient>,
    max_attempts: u32,
    attempt_timeout: Duration,
}

impl ForwardQueryUseCase {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        max_attempts: u32,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            upstream,
            max_attempts: max_attempts.max(1),
            attempt_timeout,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn execute(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.upstream.forward(query, self.attempt_timeout).await {
                Ok(reply) => {
                    if attempt > 1 {
                        debug!(
                            attempt,
                            upstream = %self.upstream.upstream(),
                            "Upstream answered after retry"
                        );
                    }
                    return Ok(reply);
                }
                Err(e) if e.is_retryable() => {
                    debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Upstream attempt failed"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());

        warn!(
            upstream = %self.upstream.upstream(),
            attempts = self.max_attempts,
            error = %last_error,
            "Upstream exhausted, dropping query"
        );

        Err(DomainError::UpstreamExhausted {
            attempts: self.max_attempts,
            last_error,
        })
    }
}
