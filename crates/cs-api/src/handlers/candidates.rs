use std::time::Instant;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::{Query, State},
};
use cs_common::api::{
    AdvancedSearchRequest, AdvancedSearchResponse, LegacySearchRequest, LegacySearchResponse,
    SuggestionsQuery, SuggestionsResponse,
};
use cs_common::search::{SuggestionKind, get_suggestions, run_advanced_search, run_legacy_search};
use metrics::{counter, histogram};
use tracing::debug;

use crate::SharedState;
use crate::auth::Recruiter;
use crate::error::ApiError;

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn record_search(mode: &'static str, started: Instant) {
    counter!("candidate_searches_total", "mode" => mode).increment(1);
    histogram!("candidate_search_duration_seconds", "mode" => mode)
        .record(started.elapsed().as_secs_f64());
}

pub async fn advanced_search(
    State(state): State<SharedState>,
    recruiter: Recruiter,
    payload: Result<Json<AdvancedSearchRequest>, JsonRejection>,
) -> Result<Json<AdvancedSearchResponse>, ApiError> {
    let started = Instant::now();
    let request = json_body(payload)?;
    let mode = request.search_mode.as_str();
    debug!(
        recruiter = %recruiter.id,
        role = recruiter.role.as_str(),
        mode,
        "advanced search requested"
    );

    let response = run_advanced_search(state.store.as_ref(), request, &state.search_config).await?;
    record_search(mode, started);

    Ok(Json(response))
}

pub async fn legacy_search(
    State(state): State<SharedState>,
    recruiter: Recruiter,
    payload: Result<Json<LegacySearchRequest>, JsonRejection>,
) -> Result<Json<LegacySearchResponse>, ApiError> {
    let started = Instant::now();
    let request = json_body(payload)?;
    debug!(recruiter = %recruiter.id, "legacy search requested");

    let response = run_legacy_search(state.store.as_ref(), request, &state.search_config).await?;
    record_search("legacy", started);

    Ok(Json(response))
}

pub async fn suggestions(
    State(state): State<SharedState>,
    recruiter: Recruiter,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let kind = SuggestionKind::parse(query.kind.as_deref());
    let prefix = query.q.unwrap_or_default();
    debug!(recruiter = %recruiter.id, kind = kind.as_str(), "suggestions requested");

    let suggestions = get_suggestions(state.store.as_ref(), &prefix, kind).await?;
    counter!("candidate_suggestions_total", "kind" => kind.as_str()).increment(1);

    Ok(Json(SuggestionsResponse { suggestions }))
}
