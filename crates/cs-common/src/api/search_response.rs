use serde::Serialize;
use serde_json::Value;

use crate::search::filter_spec::{FilterSpec, SearchMode};
use crate::search::scoring::MatchScore;
use crate::search::sort::{SortField, SortOrder};

/// A stored profile as returned to the console, with its relevance score
/// when the search carried keywords.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateHit {
    #[serde(flatten)]
    pub profile: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<MatchScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub total_matches: u64,
    pub returned: usize,
    pub applied_filter_count: usize,
    pub search_time_ms: u64,
    pub ranked_by_relevance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearchResponse {
    pub candidates: Vec<CandidateHit>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub search_stats: SearchStats,
    pub applied_filters: FilterSpec,
    pub search_mode: SearchMode,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySearchResponse {
    pub candidates: Vec<Value>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}
