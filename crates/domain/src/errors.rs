use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("DNS message has no question")]
    EmptyQuestion,

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream timeout waiting for {server}")]
    UpstreamTimeout { server: String },

    #[error("Upstream exhausted after {attempts} attempts: {last_error}")]
    UpstreamExhausted { attempts: u32, last_error: String },

    #[error("Socket failure: {0}")]
    SocketFatal(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Cache backend error: {0}")]
    CacheBackend(String),

    #[error("server answered {reason}")]
    LookupFailed { record_type: String, reason: String },
}

impl DomainError {
    /// Failures worth another attempt against the upstream resolver.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable(_) | Self::UpstreamTimeout { .. }
        )
    }

    /// Failures confined to a single datagram. The worker loop keeps running.
    pub fn is_per_packet(&self) -> bool {
        !matches!(self, Self::SocketFatal(_) | Self::ConfigurationInvalid(_))
    }
}
