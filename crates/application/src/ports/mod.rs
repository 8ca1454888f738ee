mod answer_cache;
mod cache_backend;
mod cache_maintenance_port;
mod host_resolver;
mod upstream_client;

pub use answer_cache::{AnswerCache, CachedAnswers};
pub use cache_backend::CacheBackend;
pub use cache_maintenance_port::{CacheMaintenancePort, CacheSweepOutcome};
pub use host_resolver::HostResolver;
pub use upstream_client::UpstreamClient;
