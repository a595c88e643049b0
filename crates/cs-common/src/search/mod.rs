pub mod compiler;
pub mod fields;
pub mod filter_spec;
pub mod legacy;
pub mod pagination;
pub mod scoring;
pub mod service;
pub mod sort;
pub mod storage_filter;
pub mod suggestions;

pub use compiler::{CandidateStatusTag, compile_filter, compile_filter_at};
pub use filter_spec::{Bounds, FilterSpec, SearchMode};
pub use legacy::{LegacyFilter, compile_legacy_filter, compile_legacy_filter_at};
pub use pagination::PageRequest;
pub use scoring::{MatchScore, rank_by_score, score_match};
pub use service::{run_advanced_search, run_legacy_search};
pub use sort::{SortField, SortOrder, SortSpec};
pub use storage_filter::{Condition, StorageFilter};
pub use suggestions::{SuggestionKind, get_suggestions};
