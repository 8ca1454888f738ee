use super::cache::LruAnswerCache;
use async_trait::async_trait;
use reflector_dns_application::ports::{CacheMaintenancePort, CacheSweepOutcome};
use reflector_dns_domain::DomainError;
use std::sync::Arc;
use tracing::debug;

/// Infrastructure adapter implementing `CacheMaintenancePort`.
pub struct DnsCacheMaintenance {
    cache: Arc<LruAnswerCache>,
}

impl DnsCacheMaintenance {
    pub fn new(cache: Arc<LruAnswerCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CacheMaintenancePort for DnsCacheMaintenance {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        let entries_removed = self.cache.remove_stale();
        let cache_size = self.cache.len();

        debug!(entries_removed, cache_size, "Cache sweep cycle finished");

        Ok(CacheSweepOutcome {
            entries_removed,
            cache_size,
        })
    }
}
