use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Upstream resolver, e.g. `1.1.1.1:53`.
    #[serde(default = "default_address")]
    pub address: String,

    /// Per-attempt exchange timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Idle connections kept for reuse.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            pool_size: default_pool_size(),
        }
    }
}

fn default_address() -> String {
    "1.1.1.1:53".to_string()
}

fn default_timeout_ms() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    3
}

fn default_pool_size() -> usize {
    16
}
