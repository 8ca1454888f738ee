pub mod check_cache_backend;

pub use check_cache_backend::CheckCacheBackendUseCase;
