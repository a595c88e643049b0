use std::path::Path;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use deadpool_postgres::PoolError;
use serde_json::Value;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{debug, instrument};

use crate::search::pagination::PageRequest;
use crate::search::sort::SortSpec;
use crate::search::storage_filter::{StorageFilter, resolve_path};

#[derive(Debug, Error)]
pub enum CandidateStoreError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to map candidate row: {0}")]
    Mapping(String),
    #[error("candidate store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seed file must contain a JSON array of candidate documents")]
    NotAnArray,
}

/// Reads a JSON array of candidate profile documents.
pub fn load_seed_documents(path: impl AsRef<Path>) -> Result<Vec<Value>, SeedError> {
    let raw = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&raw)? {
        Value::Array(documents) => Ok(documents),
        _ => Err(SeedError::NotAnArray),
    }
}

/// One fetched page plus the number of documents matching the filter overall.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub documents: Vec<Value>,
    pub total: u64,
}

/// Read access to candidate profiles.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn search(
        &self,
        filter: &StorageFilter,
        sort: &SortSpec,
        page: PageRequest,
    ) -> Result<SearchPage, CandidateStoreError>;

    /// Distinct string values at `path` starting with `prefix`
    /// (case-insensitive), sorted ascending, at most `limit` of them.
    async fn distinct_values(
        &self,
        path: &str,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, CandidateStoreError>;

    async fn ping(&self) -> Result<(), CandidateStoreError>;
}

/// Candidate documents held in process memory. Evaluates filters with
/// [`StorageFilter::matches`]; backs tests and database-less demo runs.
#[derive(Debug, Default)]
pub struct MemoryCandidateStore {
    documents: RwLock<Vec<Value>>,
    lookups: AtomicUsize,
}

impl MemoryCandidateStore {
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents: RwLock::new(documents),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        load_seed_documents(path).map(Self::new)
    }

    pub fn insert(&self, document: Value) -> Result<(), CandidateStoreError> {
        self.documents
            .write()
            .map_err(|_| CandidateStoreError::Unavailable("candidate list lock poisoned".into()))?
            .push(document);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `search` and `distinct_values` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Value>>, CandidateStoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.documents
            .read()
            .map_err(|_| CandidateStoreError::Unavailable("candidate list lock poisoned".into()))
    }
}

#[async_trait]
impl CandidateStore for MemoryCandidateStore {
    #[instrument(skip(self, filter))]
    async fn search(
        &self,
        filter: &StorageFilter,
        sort: &SortSpec,
        page: PageRequest,
    ) -> Result<SearchPage, CandidateStoreError> {
        let documents = self.read()?;

        let mut matched: Vec<&Value> = documents.iter().filter(|doc| filter.matches(doc)).collect();
        matched.sort_by(|a, b| sort.compare(a, b));

        let total = matched.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let documents = matched
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .cloned()
            .collect::<Vec<_>>();

        debug!(total, returned = documents.len(), "in-memory candidate search");
        Ok(SearchPage { documents, total })
    }

    async fn distinct_values(
        &self,
        path: &str,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, CandidateStoreError> {
        let documents = self.read()?;
        let prefix = prefix.to_lowercase();

        let mut values: Vec<String> = documents
            .iter()
            .flat_map(|doc| resolve_path(doc, path))
            .filter_map(Value::as_str)
            .filter(|value| value.to_lowercase().starts_with(&prefix))
            .map(str::to_string)
            .collect();
        values.sort();
        values.dedup();
        values.truncate(limit);

        Ok(values)
    }

    async fn ping(&self) -> Result<(), CandidateStoreError> {
        self.documents
            .read()
            .map(|_| ())
            .map_err(|_| CandidateStoreError::Unavailable("candidate list lock poisoned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use serde_json::json;

    fn store() -> MemoryCandidateStore {
        MemoryCandidateStore::new(vec![
            json!({ "id": 1, "professional": { "skills": ["Java", "JavaScript"], "totalExperience": 2 } }),
            json!({ "id": 2, "professional": { "skills": ["Python"], "totalExperience": 7 } }),
            json!({ "id": 3, "professional": { "skills": ["java", "Kotlin"], "totalExperience": 4 } }),
        ])
    }

    #[tokio::test]
    async fn searches_sorts_and_paginates() {
        let store = store();
        let sort = SortSpec::parse(Some("experience"), Some("desc"));
        let page = PageRequest::resolve(Some(1), Some(2), &SearchConfig::default());

        let result = store
            .search(&StorageFilter::match_all(), &sort, page)
            .await
            .unwrap();

        assert_eq!(result.total, 3);
        let ids: Vec<_> = result.documents.iter().map(|doc| doc["id"].clone()).collect();
        assert_eq!(ids, vec![json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn distinct_values_are_prefix_matched_sorted_and_capped() {
        let store = store();

        let values = store
            .distinct_values("professional.skills", "JA", 10)
            .await
            .unwrap();
        assert_eq!(values, vec!["Java", "JavaScript", "java"]);

        let capped = store
            .distinct_values("professional.skills", "ja", 1)
            .await
            .unwrap();
        assert_eq!(capped, vec!["Java"]);
        assert_eq!(store.lookup_count(), 2);
    }

    #[test]
    fn seed_file_must_be_an_array() {
        let path = std::env::temp_dir().join(format!("cs-seed-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        let result = MemoryCandidateStore::from_json_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SeedError::NotAnArray)));
    }
}
