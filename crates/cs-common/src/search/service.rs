use std::time::Instant;

use tracing::{info, instrument};

use super::compiler::compile_filter;
use super::legacy::compile_legacy_filter;
use super::pagination::PageRequest;
use super::scoring::{rank_by_score, score_match};
use super::sort::SortSpec;
use crate::api::{
    AdvancedSearchRequest, AdvancedSearchResponse, CandidateHit, LegacySearchRequest,
    LegacySearchResponse, SearchStats,
};
use crate::candidate::CandidateRecord;
use crate::config::SearchConfig;
use crate::store::{CandidateStore, CandidateStoreError};

/// Filtered, sorted, paginated candidate search with relevance scores.
///
/// Hits are scored only when the request carries keywords. Scored hits are
/// re-ranked by score within the fetched page, and only when the caller kept
/// the default sort; an explicit sort key always wins.
#[instrument(skip_all, fields(mode = request.search_mode.as_str()))]
pub async fn run_advanced_search(
    store: &dyn CandidateStore,
    request: AdvancedSearchRequest,
    config: &SearchConfig,
) -> Result<AdvancedSearchResponse, CandidateStoreError> {
    let started = Instant::now();
    let AdvancedSearchRequest {
        filters,
        page,
        limit,
        sort_by,
        sort_order,
        search_mode,
    } = request;

    let filter = compile_filter(&filters, search_mode);
    let sort = SortSpec::parse(sort_by.as_deref(), sort_order.as_deref());
    let page = PageRequest::resolve(page, limit, config);

    let result = store.search(&filter, &sort, page).await?;

    let scored = filters.keywords.is_some();
    let mut candidates: Vec<CandidateHit> = result
        .documents
        .into_iter()
        .map(|profile| {
            let match_score =
                scored.then(|| score_match(&CandidateRecord::from_document(&profile), &filters));
            CandidateHit {
                profile,
                match_score,
            }
        })
        .collect();

    let ranked_by_relevance = scored && sort.is_default_field();
    if ranked_by_relevance {
        rank_by_score(&mut candidates, |hit| hit.match_score.unwrap_or_default());
    }

    let search_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let search_stats = SearchStats {
        total_matches: result.total,
        returned: candidates.len(),
        applied_filter_count: filters.applied_filter_count(),
        search_time_ms,
        ranked_by_relevance,
    };

    info!(
        total = result.total,
        returned = candidates.len(),
        page = page.page,
        search_time_ms,
        "advanced candidate search"
    );

    Ok(AdvancedSearchResponse {
        candidates,
        total: result.total,
        page: page.page,
        limit: page.limit,
        total_pages: page.total_pages(result.total),
        search_stats,
        applied_filters: filters,
        search_mode,
        sort_by: sort.field,
        sort_order: sort.order,
    })
}

/// AND-only search through the legacy compiler. No scoring; default sort.
#[instrument(skip_all)]
pub async fn run_legacy_search(
    store: &dyn CandidateStore,
    request: LegacySearchRequest,
    config: &SearchConfig,
) -> Result<LegacySearchResponse, CandidateStoreError> {
    let filter = compile_legacy_filter(&request.filters).into_filter();
    let page = PageRequest::resolve(request.page, request.limit, config);

    let result = store.search(&filter, &SortSpec::default(), page).await?;

    info!(total = result.total, page = page.page, "legacy candidate search");
    Ok(LegacySearchResponse {
        total_pages: page.total_pages(result.total),
        candidates: result.documents,
        total: result.total,
        page: page.page,
        limit: page.limit,
    })
}
