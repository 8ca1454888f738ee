use reflector_dns_domain::config::{CliOverrides, Config};

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.server.address, "0.0.0.0:8000");
    assert_eq!(config.server.network, "udp");
    assert_eq!(config.upstream.address, "1.1.1.1:53");
    assert_eq!(config.upstream.timeout_ms, 300);
    assert_eq!(config.upstream.max_attempts, 3);
    assert_eq!(config.upstream.pool_size, 16);
    assert_eq!(config.cache.capacity, 128);
    assert_eq!(config.cache.max_age_secs, 0);
    assert!(config.cache.max_age().is_none());
    assert_eq!(config.workers.count, 0);
    assert_eq!(config.workers.queue_factor, 4);
    assert_eq!(config.workers.buffer_size, 512);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
    assert_eq!(config.lookup.server, "1.1.1.1:53");
    assert!(!config.persistent_cache.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_partial_config_fills_defaults() {
    let config = Config::parse(
        r#"
        [server]
        address = "127.0.0.1:5353"

        [cache]
        capacity = 1024
        "#,
    )
    .unwrap();

    assert_eq!(config.server.address, "127.0.0.1:5353");
    assert_eq!(config.server.network, "udp");
    assert_eq!(config.cache.capacity, 1024);
    assert_eq!(config.upstream.max_attempts, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_invalid_toml_fails() {
    assert!(Config::parse("[server\naddress = ").is_err());
}

#[test]
fn test_validate_rejects_tcp_network() {
    let mut config = Config::default();
    config.server.network = "tcp".to_string();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("only udp"));
}

#[test]
fn test_validate_accepts_uppercase_udp() {
    let mut config = Config::default();
    config.server.network = "UDP".to_string();

    assert!(config.validate().is_ok());
    assert_eq!(config.reflector_settings().network, "udp");
}

#[test]
fn test_validate_rejects_unparsable_addresses() {
    let mut config = Config::default();
    config.server.address = "not-an-address".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.upstream.address = "1.1.1.1".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_cache_capacity() {
    let mut config = Config::default();
    config.cache.capacity = 0;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_attempts_and_timeout() {
    let mut config = Config::default();
    config.upstream.max_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.upstream.timeout_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_small_buffers() {
    let mut config = Config::default();
    config.workers.buffer_size = 100;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unknown_log_format() {
    let mut config = Config::default();
    config.logging.format = "yaml".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_checks_backend_address_only_when_enabled() {
    let mut config = Config::default();
    config.persistent_cache.address = "nowhere".to_string();
    assert!(config.validate().is_ok());

    config.persistent_cache.enabled = true;
    assert!(config.validate().is_err());
}

#[test]
fn test_cli_overrides_win_over_defaults() {
    let overrides = CliOverrides {
        address: Some("127.0.0.1:9053".to_string()),
        upstream: Some("9.9.9.9:53".to_string()),
        cache_capacity: Some(42),
        workers: Some(3),
        log_level: Some("debug".to_string()),
    };

    let config = Config::load(Some("/nonexistent/reflector.toml"), CliOverrides::default());
    assert!(config.is_err());

    let config = Config::load(None, overrides).unwrap();
    let settings = config.reflector_settings();

    assert_eq!(settings.address, "127.0.0.1:9053");
    assert_eq!(settings.upstream_address, "9.9.9.9:53");
    assert_eq!(settings.cache_capacity, 42);
    assert_eq!(settings.worker_count, 3);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_zero_workers_resolves_to_parallelism() {
    let config = Config::default();
    assert!(config.reflector_settings().worker_count >= 1);
}

#[test]
fn test_backend_address_accepts_hostnames() {
    let mut config = Config::default();
    config.persistent_cache.enabled = true;

    for address in ["localhost:6379", "redis.internal:6380", "10.0.0.5:6379", "[::1]:6379"] {
        config.persistent_cache.address = address.to_string();
        assert!(config.validate().is_ok(), "{} should be accepted", address);
    }

    for address in ["localhost", ":6379", "localhost:0", "localhost:port", "::1:6379"] {
        config.persistent_cache.address = address.to_string();
        assert!(config.validate().is_err(), "{} should be rejected", address);
    }
}
