use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8000`.
    #[serde(default = "default_address")]
    pub address: String,

    /// Transport of the listening socket. Only `udp` is supported.
    #[serde(default = "default_network")]
    pub network: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            network: default_network(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_network() -> String {
    "udp".to_string()
}

/// The flat settings the listener is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectorSettings {
    pub address: String,
    pub network: String,
    pub upstream_address: String,
    pub cache_capacity: usize,
    pub worker_count: usize,
}
