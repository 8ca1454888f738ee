use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Maximum number of query identities held. Never exceeded.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Entries older than this are treated as misses. `0` disables expiry.
    #[serde(default)]
    pub max_age_secs: u64,

    /// Interval of the background sweep of stale entries.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    pub fn max_age(&self) -> Option<Duration> {
        (self.max_age_secs > 0).then(|| Duration::from_secs(self.max_age_secs))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            max_age_secs: 0,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_capacity() -> usize {
    128
}

fn default_sweep_interval_secs() -> u64 {
    60
}
