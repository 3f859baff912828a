//! crates/mood_journal_core/src/journal.rs
//!
//! Persists free-text journal entries to the `journalEntries` collection.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::{JournalEntryId, JournalEntryInput};
use crate::ports::{DocumentStore, PortResult};
use crate::scan::cancellable;
use crate::schema::{journal_fields, require_non_empty, JOURNAL_ENTRIES};

#[derive(Clone)]
pub struct JournalWriter {
    store: Arc<dyn DocumentStore>,
}

impl JournalWriter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn save(
        &self,
        input: JournalEntryInput,
        cancel: &CancellationToken,
    ) -> PortResult<JournalEntryId> {
        require_non_empty("userId", &input.user_id)?;
        require_non_empty("text", &input.text)?;

        let timestamp = input.timestamp.unwrap_or_else(Utc::now);
        let fields = journal_fields(&input.user_id, &input.text, timestamp);

        let id = cancellable(cancel, self.store.write(JOURNAL_ENTRIES, fields)).await?;
        info!(user_id = %input.user_id, entry_id = %id, "Journal entry saved");
        Ok(id)
    }
}
