use async_trait::async_trait;
use reflector_dns_domain::{DomainError, MxRecord, RecordType};
use std::net::IpAddr;

/// Port used by lookup mode to resolve hostnames through a DNS server.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// `record_type` is `A` or `AAAA`.
    async fn lookup_ips(&self, host: &str, record_type: RecordType)
        -> Result<Vec<IpAddr>, DomainError>;

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MxRecord>, DomainError>;

    async fn lookup_cname(&self, host: &str) -> Result<Option<String>, DomainError>;
}
