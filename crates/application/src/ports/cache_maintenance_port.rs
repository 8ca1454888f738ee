use async_trait::async_trait;
use reflector_dns_domain::DomainError;

/// Outcome of a cache sweep cycle.
#[derive(Debug, Default, Clone)]
pub struct CacheSweepOutcome {
    pub entries_removed: usize,
    pub cache_size: usize,
}

/// Port for periodic cache maintenance.
#[async_trait]
pub trait CacheMaintenancePort: Send + Sync {
    /// Remove entries older than the configured maximum age.
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError>;
}
