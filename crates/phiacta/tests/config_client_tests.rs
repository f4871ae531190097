//! Configuration and client tests.
//!
//! Tests actual behavior, not constants.

use phiacta::client::PhiactaClient;
use phiacta::config::{Config, display};

// =============================================================================
// Config Behavior Tests
// =============================================================================

#[test]
fn test_config_default_points_at_local_backend() {
    let config = Config::default();
    assert_eq!(config.api_url, "http://localhost:8000");
    assert_eq!(config.server_api_url(), "http://localhost:8000");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_for_testing_disables_retries_and_cache() {
    let config = Config::for_testing("http://127.0.0.1:1234/", "/tmp/token");
    assert_eq!(config.api_url, "http://127.0.0.1:1234");
    assert_eq!(config.max_retries, 0);
    assert_eq!(config.cache_max_size, 0);
    assert_eq!(config.preview_chars, display::COMPACT_PREVIEW_CHARS);
}

#[test]
fn test_config_rejects_invalid_internal_url() {
    let config = Config { internal_api_url: Some("::nope".to_string()), ..Config::default() };
    assert!(config.validate().is_err());
}

// =============================================================================
// Client Behavior Tests
// =============================================================================

#[test]
fn test_client_creation_succeeds() {
    let client = PhiactaClient::new(Config::default());
    assert!(client.is_ok());
}

#[test]
fn test_client_rejects_non_base_url() {
    let client = PhiactaClient::new(Config::new("mailto:someone@example.org"));
    assert!(client.is_err());
}

#[test]
fn test_server_client_uses_internal_url() {
    let config = Config {
        internal_api_url: Some("http://api:8000".to_string()),
        ..Config::new("https://phiacta.example.org")
    };
    let client = PhiactaClient::for_server(&config).unwrap();
    assert_eq!(client.base_url(), "http://api:8000/");
}

#[tokio::test]
async fn test_client_starts_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let client =
        PhiactaClient::new(Config::for_testing("http://127.0.0.1:9", dir.path().join("t"))).unwrap();

    assert!(!client.load_session().await.unwrap());
    assert!(!client.is_authenticated().await);
}

#[test]
fn test_client_debug_hides_token() {
    let client = PhiactaClient::new(Config::default()).unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("base_url"));
    assert!(!debug.to_lowercase().contains("bearer"));
}
