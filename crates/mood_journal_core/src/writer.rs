//! crates/mood_journal_core/src/writer.rs
//!
//! Appends mood observations to the `moodLogs` collection.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{is_known_mood, MoodObservationId, MoodObservationInput};
use crate::ports::{DocumentStore, PortResult};
use crate::scan::cancellable;
use crate::schema::{mood_fields, require_non_empty, MOOD_LOGS};

#[derive(Clone)]
pub struct MoodLogWriter {
    store: Arc<dyn DocumentStore>,
}

impl MoodLogWriter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Durably appends one observation and returns its store-assigned id.
    ///
    /// Fails with `InvalidInput` (and writes nothing) when `user_id` or `mood`
    /// is empty or whitespace-only, `StoreUnavailable` when the write errors,
    /// and `Cancelled` when `cancel` fires first. Accepted labels are stored
    /// untrimmed. No retry is attempted here.
    pub async fn append(
        &self,
        input: MoodObservationInput,
        cancel: &CancellationToken,
    ) -> PortResult<MoodObservationId> {
        require_non_empty("userId", &input.user_id)?;
        require_non_empty("mood", &input.mood)?;

        if !is_known_mood(&input.mood) {
            warn!(mood = %input.mood, "Logging a mood outside the known vocabulary");
        }

        let timestamp = input.timestamp.unwrap_or_else(Utc::now);
        let fields = mood_fields(&input.user_id, &input.mood, timestamp);

        let id = cancellable(cancel, self.store.write(MOOD_LOGS, fields)).await?;
        info!(user_id = %input.user_id, observation_id = %id, "Mood observation logged");
        Ok(id)
    }
}
