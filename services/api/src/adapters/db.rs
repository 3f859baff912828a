//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DocumentStore` port from the `core` crate. Every collection lives in a
//! single PostgreSQL table with a JSONB body, accessed through `sqlx`.

use async_trait::async_trait;
use mood_journal_core::domain::DocumentId;
use mood_journal_core::ports::{
    Document, DocumentStore, Filter, FilterOp, Page, PageRequest, PortError, PortResult,
};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DocumentStore` port.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Creates a new `PgDocumentStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DocumentRecord {
    id: Uuid,
    seq: i64,
    body: Json<Map<String, Value>>,
}

impl DocumentRecord {
    fn to_domain(self) -> Document {
        Document {
            id: DocumentId(self.id.to_string()),
            fields: self.body.0,
        }
    }
}

/// Page size as a SQL `LIMIT`, leaving room for the one-row lookahead.
fn sql_limit(requested: usize) -> i64 {
    i64::try_from(requested).unwrap_or(i64::MAX - 1).clamp(1, i64::MAX - 1)
}

/// The JSONB object `{field: value}` that a matching body must contain.
fn containment(filter: &Filter) -> Map<String, Value> {
    let mut contains = Map::new();
    contains.insert(filter.field.clone(), filter.value.clone());
    contains
}

/// Decode problems mean bad data; everything else is treated as the store being unreachable.
fn store_error(e: sqlx::Error) -> PortError {
    match e {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            PortError::Unexpected(e.to_string())
        }
        _ => {
            error!("Document store call failed: {:?}", e);
            PortError::StoreUnavailable(e.to_string())
        }
    }
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn write(&self, collection: &str, fields: Map<String, Value>) -> PortResult<DocumentId> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection)
            .bind(Json(fields))
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(DocumentId(id.to_string()))
    }

    async fn query(&self, collection: &str, filter: &Filter, page: PageRequest) -> PortResult<Page> {
        // The cursor is the last `seq` handed out; pages are keyset-paginated on it.
        let after_seq = match page.cursor.as_deref() {
            None => 0,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| PortError::InvalidInput(format!("invalid page cursor '{}'", raw)))?,
        };
        let limit = sql_limit(page.limit);

        // Equality on a top-level field is expressed as containment so the
        // GIN index on `body` can serve it.
        let sql = match filter.op {
            FilterOp::Eq => {
                "SELECT id, seq, body FROM documents \
                 WHERE collection = $1 AND body @> $2 AND seq > $3 \
                 ORDER BY seq ASC LIMIT $4"
            }
        };

        // One extra row tells us whether another page exists.
        let mut records = sqlx::query_as::<_, DocumentRecord>(sql)
            .bind(collection)
            .bind(Json(containment(filter)))
            .bind(after_seq)
            .bind(limit + 1)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        let next_cursor = if records.len() as i64 > limit {
            records.truncate(limit as usize);
            records.last().map(|r| r.seq.to_string())
        } else {
            None
        };

        Ok(Page {
            documents: records.into_iter().map(|r| r.to_domain()).collect(),
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_limit_stays_positive_with_room_for_lookahead() {
        assert_eq!(sql_limit(0), 1);
        assert_eq!(sql_limit(100), 100);
        assert_eq!(sql_limit(usize::MAX), i64::MAX - 1);
        assert!(sql_limit(usize::MAX).checked_add(1).is_some());
    }

    #[test]
    fn eq_filter_becomes_single_field_containment() {
        let contains = containment(&Filter::eq("userId", "u1"));
        assert_eq!(Value::Object(contains), serde_json::json!({ "userId": "u1" }));
    }
}
