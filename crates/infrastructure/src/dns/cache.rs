mod lru_cache;
mod metrics;

pub use lru_cache::{EvictionCallback, LruAnswerCache};
pub use metrics::{CacheMetrics, CacheStats};
