use async_trait::async_trait;
use reflector_dns_domain::DomainError;

/// Port for the optional external key/value store.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn ping(&self) -> Result<(), DomainError>;

    fn describe(&self) -> String;
}
