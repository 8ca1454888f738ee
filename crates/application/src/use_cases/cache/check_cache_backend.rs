use crate::ports::CacheBackend;
use reflector_dns_domain::DomainError;
use std::sync::Arc;
use tracing::{error, info};

/// Verifies at startup that the persistent cache backend answers.
pub struct CheckCacheBackendUseCase {
    backend: Arc<dyn CacheBackend>,
}

impl CheckCacheBackendUseCase {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self) -> Result<(), DomainError> {
        let target = self.backend.describe();
        match self.backend.ping().await {
            Ok(()) => {
                info!(backend = %target, "Persistent cache backend reachable");
                Ok(())
            }
            Err(e) => {
                error!(backend = %target, error = %e, "Persistent cache backend unreachable");
                Err(DomainError::CacheBackend(format!("{}: {}", target, e)))
            }
        }
    }
}
