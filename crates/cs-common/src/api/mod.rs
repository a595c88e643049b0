pub mod search_request;
pub mod search_response;

pub use search_request::{AdvancedSearchRequest, LegacySearchRequest, SuggestionsQuery};
pub use search_response::{
    AdvancedSearchResponse, CandidateHit, LegacySearchResponse, SearchStats, SuggestionsResponse,
};
