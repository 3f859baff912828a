//! crates/mood_journal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The document store is an injected capability: the core only ever sees this
//! boundary, so a hosted document database, a relational table or the
//! in-memory store used by the tests can all sit behind it.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::DocumentId;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every core operation and every port.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Caller-supplied data violates a precondition. Not retryable without correction.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The external store failed or timed out. Retryable by the caller.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    /// The operation was aborted by caller-requested cancellation or a timeout.
    #[error("Operation cancelled")]
    Cancelled,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// Whether the caller may reasonably retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PortError::StoreUnavailable(_) | PortError::Cancelled)
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Document Store Types
//=========================================================================================

/// A stored document: a store-assigned identity plus its field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

/// Comparison operator for a query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
}

/// A single-field filter, e.g. `userId == "u1"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    /// Evaluates the filter against a document's fields.
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        match self.op {
            FilterOp::Eq => fields.get(&self.field) == Some(&self.value),
        }
    }
}

/// Which page of a query result to fetch. `cursor` is `None` for the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub limit: usize,
}

impl PageRequest {
    pub fn first(limit: usize) -> Self {
        Self { cursor: None, limit }
    }
}

/// One page of query results. A `None` cursor marks the last page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub documents: Vec<Document>,
    pub next_cursor: Option<String>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists `fields` as a new document in `collection` and returns its identity.
    async fn write(&self, collection: &str, fields: Map<String, Value>) -> PortResult<DocumentId>;

    /// Fetches one page of the documents in `collection` matching `filter`.
    /// No ordering is promised across or within pages.
    async fn query(&self, collection: &str, filter: &Filter, page: PageRequest) -> PortResult<Page>;
}
