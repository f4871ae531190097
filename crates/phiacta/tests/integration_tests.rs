//! Integration tests against a running Phiacta backend.
//!
//! Point `PHIACTA_API_URL` at a backend (defaults to `http://localhost:8000`).
//! Run with: `cargo test --features integration -- --nocapture`

#![cfg(feature = "integration")]

use phiacta::client::PhiactaClient;
use phiacta::config::Config;
use phiacta::markdown::{ELLIPSIS, scan};
use phiacta::models::ClaimFilters;
use phiacta::namespace::build_namespace_tree;

fn create_client(dir: &tempfile::TempDir) -> PhiactaClient {
    let mut config = Config::from_env().expect("valid environment");
    config.token_path = dir.path().join("token");
    PhiactaClient::new(config).expect("Failed to create client")
}

#[tokio::test]
async fn test_backend_health() {
    let dir = tempfile::tempdir().unwrap();
    let client = create_client(&dir);

    let health = client.backend_health().await.unwrap();
    println!("Backend health: {health}");
    assert!(health.is_object());
}

#[tokio::test]
async fn test_list_claims_previews_are_safe() {
    let dir = tempfile::tempdir().unwrap();
    let client = create_client(&dir);

    let page = client.list_claims(20, 0, &ClaimFilters::default()).await.unwrap();
    println!("Fetched {} of {} claims", page.items.len(), page.total);

    for claim in &page.items {
        let preview = phiacta::truncate_preserving_math(&claim.content, 200);
        let body = preview.strip_suffix(ELLIPSIS).unwrap_or(&preview);
        if preview.len() != claim.content.len() {
            assert!(scan(body).is_closed(), "open span in preview of {}", claim.id);
        }
    }
}

#[tokio::test]
async fn test_namespaces_form_a_tree() {
    let dir = tempfile::tempdir().unwrap();
    let client = create_client(&dir);

    let namespaces = client.list_namespaces().await.unwrap();
    let tree = build_namespace_tree(&namespaces.items);

    assert_eq!(tree.len(), namespaces.items.len());
}

#[tokio::test]
async fn test_restore_session_without_token() {
    let dir = tempfile::tempdir().unwrap();
    let client = create_client(&dir);

    assert!(client.restore_session().await.unwrap().is_none());
}
