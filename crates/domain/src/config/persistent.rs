use serde::{Deserialize, Serialize};
use std::time::Duration;

/// External key/value store. Only checked for reachability at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersistentCacheConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub db: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl PersistentCacheConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn password(&self) -> Option<&str> {
        (!self.password.is_empty()).then_some(self.password.as_str())
    }
}

impl Default for PersistentCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: default_address(),
            password: String::new(),
            db: 0,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:6379".to_string()
}

fn default_timeout_ms() -> u64 {
    1000
}
