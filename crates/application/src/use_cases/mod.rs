pub mod cache;
pub mod dns;
pub mod lookup;

pub use cache::CheckCacheBackendUseCase;
pub use dns::ForwardQueryUseCase;
pub use lookup::LookupHostsUseCase;
