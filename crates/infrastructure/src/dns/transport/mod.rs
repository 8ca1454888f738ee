pub mod udp;
pub mod udp_pool;

pub use udp::PooledUpstreamClient;
pub use udp_pool::{PoolStats, UpstreamConnection, UpstreamPool};
