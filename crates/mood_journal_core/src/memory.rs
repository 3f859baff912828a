//! crates/mood_journal_core/src/memory.rs
//!
//! An in-process `DocumentStore`. Used as the test fake and as the `memory`
//! backend for local development. Supports a store-side page cap and simple
//! fault injection so pagination and failure paths can be exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::DocumentId;
use crate::ports::{Document, DocumentStore, Filter, Page, PageRequest, PortError, PortResult};

pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    max_page_size: usize,
    available: AtomicBool,
    /// 1-based index of the query call that should fail; 0 disables.
    fail_query_at: AtomicUsize,
    writes: AtomicUsize,
    queries: AtomicUsize,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            max_page_size: usize::MAX,
            available: AtomicBool::new(true),
            fail_query_at: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    /// Caps every page at `max` documents regardless of the requested limit.
    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = max.max(1);
        self
    }

    /// Makes every subsequent call fail with `StoreUnavailable` (or recover).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Fails the `n`th query call (counted over the store's lifetime, 1-based).
    pub fn fail_query_at(&self, n: usize) {
        self.fail_query_at.store(n, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of query calls attempted, including failed ones.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of documents held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn check_available(&self) -> PortResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PortError::StoreUnavailable("in-memory store is offline".to_string()))
        }
    }
}

fn lock_poisoned(op: &str) -> PortError {
    PortError::Unexpected(format!("in-memory store lock poisoned during {op}"))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn write(&self, collection: &str, fields: Map<String, Value>) -> PortResult<DocumentId> {
        self.check_available()?;

        let id = DocumentId(Uuid::new_v4().to_string());
        let mut collections = self.collections.write().map_err(|_| lock_poisoned("write"))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(id)
    }

    async fn query(&self, collection: &str, filter: &Filter, page: PageRequest) -> PortResult<Page> {
        let call = self.queries.fetch_add(1, Ordering::SeqCst) + 1;
        self.check_available()?;
        if self.fail_query_at.load(Ordering::SeqCst) == call {
            return Err(PortError::StoreUnavailable(format!(
                "injected failure on query #{call}"
            )));
        }

        // Cursors are offsets into the filtered sequence.
        let offset = match page.cursor.as_deref() {
            None => 0,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| PortError::InvalidInput(format!("invalid page cursor '{raw}'")))?,
        };
        let limit = page.limit.clamp(1, self.max_page_size);

        let collections = self.collections.read().map_err(|_| lock_poisoned("query"))?;
        let matching: Vec<&Document> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(&d.fields)).collect())
            .unwrap_or_default();

        let documents: Vec<Document> = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|d| (*d).clone())
            .collect();
        let consumed = offset + documents.len();
        let next_cursor = (consumed < matching.len()).then(|| consumed.to_string());

        Ok(Page {
            documents,
            next_cursor,
        })
    }
}
