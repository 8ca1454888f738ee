#![allow(dead_code)]

use async_trait::async_trait;
use reflector_dns_application::ports::{CacheMaintenancePort, CacheSweepOutcome};
use reflector_dns_domain::DomainError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

pub struct MockCacheMaintenancePort {
    sweep_count: Arc<AtomicU64>,
    should_fail: AtomicBool,
}

impl MockCacheMaintenancePort {
    pub fn new() -> Self {
        Self {
            sweep_count: Arc::new(AtomicU64::new(0)),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn sweep_call_count(&self) -> u64 {
        self.sweep_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheMaintenancePort for MockCacheMaintenancePort {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        self.sweep_count.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::CacheBackend("sweep failed".to_string()));
        }
        Ok(CacheSweepOutcome {
            entries_removed: 1,
            cache_size: 10,
        })
    }
}
