mod support;

use std::sync::Arc;

use axum::http::StatusCode;
use cs_common::MemoryCandidateStore;
use serde_json::json;
use support::{app_with, get_json, profile};

fn store() -> Arc<MemoryCandidateStore> {
    Arc::new(MemoryCandidateStore::new(vec![
        profile(1, "Java Developer", &["Java", "JavaScript"], 3.0, "Jaipur"),
        profile(2, "Janitor", &["Jakarta EE"], 4.0, "Jamnagar"),
    ]))
}

#[tokio::test]
async fn single_character_prefix_skips_storage() {
    let store = store();
    let app = app_with(store.clone());

    let (status, body) = get_json(&app, "/api/candidates/suggestions?q=j").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"], json!([]));
    assert_eq!(store.lookup_count(), 0);
}

#[tokio::test]
async fn two_character_prefix_returns_capped_values() {
    let store = store();
    let app = app_with(store.clone());

    let (status, body) = get_json(&app, "/api/candidates/suggestions?q=ja").await;

    assert_eq!(status, StatusCode::OK);
    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 10);
    assert_eq!(suggestions[0], "Jakarta EE");
    assert_eq!(store.lookup_count(), 4);
}

#[tokio::test]
async fn typed_lookup_targets_one_attribute() {
    let app = app_with(store());

    let (_, body) = get_json(&app, "/api/candidates/suggestions?q=JA&type=locations").await;

    assert_eq!(body["suggestions"], json!(["Jaipur", "Jamnagar"]));
}
