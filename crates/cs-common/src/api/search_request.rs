use serde::Deserialize;

use crate::search::filter_spec::{FilterSpec, SearchMode, lenient_int, null_as_default};

/// Body of `POST /api/candidates/advanced-search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedSearchRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub filters: FilterSpec,
    #[serde(deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub search_mode: SearchMode,
}

/// Body of the legacy `POST /api/candidates/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacySearchRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub filters: FilterSpec,
    #[serde(deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
}

/// Query string of `GET /api/candidates/suggestions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
