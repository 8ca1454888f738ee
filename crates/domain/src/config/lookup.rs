use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// DNS server the lookup subcommand dials.
    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_server() -> String {
    "1.1.1.1:53".to_string()
}

fn default_timeout_ms() -> u64 {
    1000
}
