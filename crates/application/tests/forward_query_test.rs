mod helpers;

use helpers::MockUpstreamClient;
use reflector_dns_application::use_cases::ForwardQueryUseCase;
use reflector_dns_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;

const QUERY: &[u8] = &[0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];

fn timeout_error() -> DomainError {
    DomainError::UpstreamTimeout {
        server: "127.0.0.1:53".to_string(),
    }
}

#[tokio::test]
async fn test_first_attempt_success() {
    let upstream = Arc::new(MockUpstreamClient::answering(vec![1, 2, 3]));
    let use_case = ForwardQueryUseCase::new(upstream.clone(), 3, Duration::from_millis(50));

    let reply = use_case.execute(QUERY).await.unwrap();

    assert_eq!(reply, vec![1, 2, 3]);
    assert_eq!(upstream.call_count(), 1);
}

#[tokio::test]
async fn test_retries_until_success() {
    let upstream = Arc::new(
        MockUpstreamClient::answering(vec![9])
            .then(Err(timeout_error()))
            .then(Err(DomainError::UpstreamUnavailable("reset".to_string()))),
    );
    let use_case = ForwardQueryUseCase::new(upstream.clone(), 3, Duration::from_millis(50));

    let reply = use_case.execute(QUERY).await.unwrap();

    assert_eq!(reply, vec![9]);
    assert_eq!(upstream.call_count(), 3);
}

#[tokio::test]
async fn test_exhausts_attempt_bound() {
    let upstream = Arc::new(MockUpstreamClient::failing(timeout_error()));
    let use_case = ForwardQueryUseCase::new(upstream.clone(), 3, Duration::from_millis(50));

    let result = use_case.execute(QUERY).await;

    assert!(matches!(
        result,
        Err(DomainError::UpstreamExhausted { attempts: 3, .. })
    ));
    assert_eq!(upstream.call_count(), 3);
}

#[tokio::test]
async fn test_non_retryable_error_stops_immediately() {
    let upstream = Arc::new(MockUpstreamClient::failing(DomainError::SocketFatal(
        "closed".to_string(),
    )));
    let use_case = ForwardQueryUseCase::new(upstream.clone(), 3, Duration::from_millis(50));

    let result = use_case.execute(QUERY).await;

    assert!(matches!(result, Err(DomainError::SocketFatal(_))));
    assert_eq!(upstream.call_count(), 1);
}

#[tokio::test]
async fn test_zero_attempts_is_clamped_to_one() {
    let upstream = Arc::new(MockUpstreamClient::failing(timeout_error()));
    let use_case = ForwardQueryUseCase::new(upstream.clone(), 0, Duration::from_millis(50));

    assert_eq!(use_case.max_attempts(), 1);
    assert!(use_case.execute(QUERY).await.is_err());
    assert_eq!(upstream.call_count(), 1);
}
