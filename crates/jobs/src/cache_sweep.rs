use reflector_dns_application::ports::CacheMaintenancePort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Periodically drops answer-cache entries older than the configured maximum
/// age. Runs until its cancellation token fires.
pub struct CacheSweepJob {
    maintenance: Arc<dyn CacheMaintenancePort>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CacheSweepJob {
    pub fn new(maintenance: Arc<dyn CacheMaintenancePort>) -> Self {
        Self {
            maintenance,
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval.as_secs(), "Starting cache sweep job");

        let mut interval = tokio::time::interval(self.interval);
        // The first tick completes immediately; nothing is stale yet.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("CacheSweepJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    match self.maintenance.run_sweep_cycle().await {
                        Ok(outcome) if outcome.entries_removed > 0 => {
                            info!(
                                entries_removed = outcome.entries_removed,
                                cache_size = outcome.cache_size,
                                "Cache sweep cycle completed"
                            );
                        }
                        Ok(outcome) => {
                            debug!(
                                cache_size = outcome.cache_size,
                                "Cache sweep found nothing stale"
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "Cache sweep cycle failed");
                        }
                    }
                }
            }
        }
    }
}
