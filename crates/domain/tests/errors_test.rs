use reflector_dns_domain::DomainError;

#[test]
fn test_upstream_failures_are_retryable() {
    assert!(DomainError::UpstreamUnavailable("refused".to_string()).is_retryable());
    assert!(DomainError::UpstreamTimeout {
        server: "1.1.1.1:53".to_string()
    }
    .is_retryable());
    assert!(!DomainError::MalformedMessage("short".to_string()).is_retryable());
    assert!(!DomainError::SocketFatal("closed".to_string()).is_retryable());
}

#[test]
fn test_per_packet_classification() {
    assert!(DomainError::MalformedMessage("short".to_string()).is_per_packet());
    assert!(DomainError::EmptyQuestion.is_per_packet());
    assert!(DomainError::UpstreamExhausted {
        attempts: 3,
        last_error: "timeout".to_string()
    }
    .is_per_packet());
    assert!(!DomainError::SocketFatal("closed".to_string()).is_per_packet());
    assert!(!DomainError::ConfigurationInvalid("bad".to_string()).is_per_packet());
}
