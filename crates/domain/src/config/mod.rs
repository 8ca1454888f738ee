pub mod cache;
pub mod errors;
pub mod logging;
pub mod lookup;
pub mod persistent;
pub mod root;
pub mod server;
pub mod upstream;
pub mod workers;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use lookup::LookupConfig;
pub use persistent::PersistentCacheConfig;
pub use root::{CliOverrides, Config};
pub use server::{ReflectorSettings, ServerConfig};
pub use upstream::UpstreamConfig;
pub use workers::WorkersConfig;
