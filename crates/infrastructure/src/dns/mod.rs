pub mod buffer_pool;
pub mod cache;
pub mod cache_maintenance;
pub mod codec;
pub mod listener;
pub mod processor;
pub mod transport;

pub use buffer_pool::{BufferPool, PooledBuffer};
pub use cache::{CacheStats, LruAnswerCache};
pub use cache_maintenance::DnsCacheMaintenance;
pub use codec::MessageCodec;
pub use listener::{Listener, WorkerOptions};
pub use processor::QueryProcessor;
pub use transport::{PoolStats, PooledUpstreamClient, UpstreamPool};
