pub mod api;
pub mod candidate;
pub mod config;
pub mod db;
pub mod logging;
pub mod search;
pub mod store;

pub use candidate::CandidateRecord;
pub use config::SearchConfig;
pub use search::{FilterSpec, MatchScore, SearchMode, StorageFilter};
pub use store::{
    CandidateStore, CandidateStoreError, MemoryCandidateStore, SearchPage, SeedError,
    load_seed_documents,
};
