use async_trait::async_trait;
use reflector_dns_domain::DomainError;
use std::time::Duration;

/// Port for a single exchange with the configured upstream resolver.
///
/// Implementations never block past `timeout` and never panic when the
/// upstream is unreachable; retry policy belongs to the caller.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn forward(&self, query: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError>;

    fn upstream(&self) -> String;
}
