use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_postgres::types::{Json, ToSql};
use tracing::{debug, info, instrument};

use super::PgPool;
use super::util::{escape_like, timed};
use crate::search::pagination::PageRequest;
use crate::search::sort::{SortOrder, SortSpec};
use crate::search::storage_filter::{StorageFilter, jsonpath_string_values};
use crate::store::{CandidateStore, CandidateStoreError, SearchPage};

/// Candidate profiles stored as JSONB documents in `portal.candidates`.
///
/// Filters are pushed down as SQL/JSON path predicates (`profile @? path`),
/// which the `jsonb_path_ops` GIN index serves.
#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_all(&self) -> Result<u64, CandidateStoreError> {
        let client = self.pool.get().await?;
        let row = timed(
            "candidates_count_all",
            client.query_one("SELECT COUNT(*) FROM portal.candidates", &[]),
        )
        .await?;
        Ok(row.get::<_, i64>(0).max(0) as u64)
    }

    /// Inserts profile documents in one transaction. Non-object entries are
    /// rejected before anything is written.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn import_documents(&self, documents: &[Value]) -> Result<u64, CandidateStoreError> {
        if let Some(position) = documents.iter().position(|doc| !doc.is_object()) {
            return Err(CandidateStoreError::Mapping(format!(
                "candidate document #{position} is not a JSON object"
            )));
        }

        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;
        let statement = tx
            .prepare("INSERT INTO portal.candidates (profile) VALUES ($1)")
            .await?;

        let mut inserted = 0;
        for document in documents {
            inserted += tx.execute(&statement, &[&Json(document)]).await?;
        }
        tx.commit().await?;

        info!(inserted, "imported candidate documents");
        Ok(inserted)
    }
}

/// `ORDER BY` expression for a whitelisted sort key. Missing values sort
/// lowest, matching the in-memory store.
fn order_by_clause(sort: &SortSpec) -> String {
    let pointer = sort.field.path().replace('.', ",");
    let nulls = match sort.order {
        SortOrder::Asc => "NULLS FIRST",
        SortOrder::Desc => "NULLS LAST",
    };
    let direction = sort.order.as_sql();
    format!("profile #> '{{{pointer}}}' {direction} {nulls}, id {direction}")
}

/// Surfaces the row id on the returned document when the profile carries none.
fn with_row_id(id: i64, profile: Value) -> Result<Value, CandidateStoreError> {
    match profile {
        Value::Object(mut fields) => {
            fields.entry("id").or_insert(Value::from(id));
            Ok(Value::Object(fields))
        }
        Value::Null => Ok(Value::Object(Map::from_iter([("id".to_string(), Value::from(id))]))),
        other => Err(CandidateStoreError::Mapping(format!(
            "candidate {id} profile is a {}, expected an object",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    #[instrument(skip(self, filter))]
    async fn search(
        &self,
        filter: &StorageFilter,
        sort: &SortSpec,
        page: PageRequest,
    ) -> Result<SearchPage, CandidateStoreError> {
        let client = self.pool.get().await?;

        let limit = i64::from(page.limit);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let predicate = filter.to_jsonpath();
        let where_clause = if predicate.is_some() {
            "WHERE profile @? $1::text::jsonpath"
        } else {
            ""
        };
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
        if let Some(predicate) = predicate.as_ref() {
            params.push(predicate);
        }

        let count_sql = format!("SELECT COUNT(*) FROM portal.candidates {where_clause}");
        let total: i64 = timed("candidates_search_count", client.query_one(&count_sql, &params))
            .await?
            .get(0);

        let limit_index = params.len() + 1;
        let page_sql = format!(
            "SELECT id, profile FROM portal.candidates {where_clause} ORDER BY {order} \
             LIMIT ${limit_index} OFFSET ${offset_index}",
            order = order_by_clause(sort),
            offset_index = limit_index + 1,
        );
        params.push(&limit);
        params.push(&offset);

        let rows = timed("candidates_search_page", client.query(&page_sql, &params)).await?;
        let documents = rows
            .into_iter()
            .map(|row| {
                let id: i64 = row.try_get("id")?;
                let profile: Value = row.try_get("profile")?;
                with_row_id(id, profile)
            })
            .collect::<Result<Vec<_>, CandidateStoreError>>()?;

        debug!(total, returned = documents.len(), "postgres candidate search");
        Ok(SearchPage {
            documents,
            total: total.max(0) as u64,
        })
    }

    #[instrument(skip(self))]
    async fn distinct_values(
        &self,
        path: &str,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, CandidateStoreError> {
        let client = self.pool.get().await?;

        let values_path = jsonpath_string_values(path);
        let pattern = format!("{}%", escape_like(prefix));
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = timed(
            "candidates_distinct_values",
            client.query(
                "SELECT DISTINCT value FROM (
                    SELECT jsonb_path_query(profile, $1::text::jsonpath) #>> '{}' AS value
                    FROM portal.candidates
                 ) AS candidate_values
                 WHERE value ILIKE $2
                 ORDER BY value
                 LIMIT $3",
                &[&values_path, &pattern, &limit],
            ),
        )
        .await?;

        rows.into_iter()
            .map(|row| row.try_get::<_, String>(0).map_err(CandidateStoreError::from))
            .collect()
    }

    async fn ping(&self) -> Result<(), CandidateStoreError> {
        let client = self.pool.get().await?;
        client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }
}
