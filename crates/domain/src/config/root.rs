use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::lookup::LookupConfig;
use super::persistent::PersistentCacheConfig;
use super::server::{ReflectorSettings, ServerConfig};
use super::upstream::UpstreamConfig;
use super::workers::WorkersConfig;

const DEFAULT_CONFIG_FILE: &str = "reflector-dns.toml";

/// Main configuration structure for the reflector
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub workers: WorkersConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub lookup: LookupConfig,

    #[serde(default)]
    pub persistent_cache: PersistentCacheConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. reflector-dns.toml in current directory
    /// 3. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(address) = overrides.address {
            self.server.address = address;
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.address = upstream;
        }
        if let Some(capacity) = overrides.cache_capacity {
            self.cache.capacity = capacity;
        }
        if let Some(workers) = overrides.workers {
            self.workers.count = workers;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration. Must pass before any socket is opened.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.server.network.eq_ignore_ascii_case("udp") {
            return Err(ConfigError::Validation(format!(
                "Unsupported network '{}': only udp is supported",
                self.server.network
            )));
        }

        parse_socket_addr("server.address", &self.server.address)?;
        parse_socket_addr("upstream.address", &self.upstream.address)?;

        if self.cache.capacity == 0 {
            return Err(ConfigError::Validation(
                "cache.capacity must be greater than 0".to_string(),
            ));
        }

        if self.upstream.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "upstream.max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "upstream.timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.workers.queue_factor == 0 {
            return Err(ConfigError::Validation(
                "workers.queue_factor must be greater than 0".to_string(),
            ));
        }

        if self.workers.max_in_flight == 0 {
            return Err(ConfigError::Validation(
                "workers.max_in_flight must be greater than 0".to_string(),
            ));
        }

        if !(512..=65_535).contains(&self.workers.buffer_size) {
            return Err(ConfigError::Validation(format!(
                "workers.buffer_size must be between 512 and 65535, got {}",
                self.workers.buffer_size
            )));
        }

        if self.cache.max_age_secs > 0 && self.cache.sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.sweep_interval_secs must be greater than 0 when max_age_secs is set"
                    .to_string(),
            ));
        }

        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "Unknown logging.format '{}': expected text or json",
                    other
                )))
            }
        }

        if self.persistent_cache.enabled {
            parse_host_port("persistent_cache.address", &self.persistent_cache.address)?;
        }

        Ok(())
    }

    /// The settings the listener needs, with the worker count resolved.
    pub fn reflector_settings(&self) -> ReflectorSettings {
        ReflectorSettings {
            address: self.server.address.clone(),
            network: self.server.network.to_ascii_lowercase(),
            upstream_address: self.upstream.address.clone(),
            cache_capacity: self.cache.capacity,
            worker_count: self.workers.effective_count(),
        }
    }
}

fn parse_socket_addr(field: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|e| {
        ConfigError::Validation(format!("{} '{}' is not a socket address: {}", field, value, e))
    })
}

/// Accepts `host:port` where host may be a name, an IPv4 address or a
/// bracketed IPv6 address. Names are resolved when the backend is dialed.
fn parse_host_port(field: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::Validation(format!(
            "{} '{}' is not host:port: {}",
            field, value, reason
        ))
    };

    let (host, port) = value.rsplit_once(':').ok_or_else(|| invalid("missing port"))?;
    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    if host.starts_with('[') != host.ends_with(']') {
        return Err(invalid("unbalanced brackets"));
    }
    if !host.starts_with('[') && host.contains(':') {
        return Err(invalid("IPv6 hosts must be bracketed"));
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid("port must be 1-65535")),
        Ok(_) => Ok(()),
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub address: Option<String>,
    pub upstream: Option<String>,
    pub cache_capacity: Option<usize>,
    pub workers: Option<usize>,
    pub log_level: Option<String>,
}
