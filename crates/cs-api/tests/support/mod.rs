#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use cs_common::MemoryCandidateStore;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const API_KEY: &str = "recruiter-key";

pub fn profile(id: u64, title: &str, key_skills: &[&str], experience: f64, city: &str) -> Value {
    json!({
        "id": id,
        "updatedAt": format!("2026-09-{:02}T10:00:00.000Z", 28 - id),
        "personalInfo": { "fullName": format!("Candidate {id}"), "currentCity": city },
        "professional": {
            "currentJobTitle": title,
            "skills": key_skills,
            "keySkills": key_skills,
            "totalExperience": experience
        },
        "profileStatus": { "isActive": true, "completionPercentage": 80 }
    })
}

pub fn app_with(store: Arc<MemoryCandidateStore>) -> Router {
    cs_api::create_router(cs_api::test_state_with_store(API_KEY, store))
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .header("x-api-key", API_KEY)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn ids(body: &Value) -> Vec<u64> {
    body["candidates"]
        .as_array()
        .map(|candidates| {
            candidates
                .iter()
                .filter_map(|candidate| candidate["id"].as_u64())
                .collect()
        })
        .unwrap_or_default()
}
