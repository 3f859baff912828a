//! crates/mood_journal_core/src/history.rs
//!
//! Most-recent-first listing of a user's mood observations.

use std::cmp::Reverse;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::aggregator::DEFAULT_PAGE_SIZE;
use crate::domain::MoodObservation;
use crate::ports::{DocumentStore, Filter, PortError, PortResult};
use crate::scan::drain;
use crate::schema::{require_non_empty, FIELD_USER_ID, MOOD_LOGS};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Clone)]
pub struct MoodHistoryReader {
    store: Arc<dyn DocumentStore>,
    page_size: usize,
}

impl MoodHistoryReader {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: Arc<dyn DocumentStore>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Returns up to `limit` observations, newest first.
    ///
    /// The store promises no order, so every page is read and sorted here.
    /// Equal timestamps fall back to document id order.
    pub async fn recent(
        &self,
        user_id: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> PortResult<Vec<MoodObservation>> {
        require_non_empty("userId", user_id)?;
        if limit == 0 {
            return Err(PortError::InvalidInput("limit must be at least 1".to_string()));
        }
        let limit = limit.min(MAX_HISTORY_LIMIT);

        let filter = Filter::eq(FIELD_USER_ID, user_id);
        let mut observations = Vec::new();
        drain(
            self.store.as_ref(),
            MOOD_LOGS,
            &filter,
            self.page_size,
            cancel,
            |doc| {
                observations.push(MoodObservation::try_from(doc)?);
                Ok(())
            },
        )
        .await?;

        observations.sort_by(|a, b| {
            Reverse(a.timestamp)
                .cmp(&Reverse(b.timestamp))
                .then_with(|| a.id.cmp(&b.id))
        });
        observations.truncate(limit);

        debug!(user_id, returned = observations.len(), "Mood history read");
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MoodObservationInput;
    use crate::memory::InMemoryDocumentStore;
    use crate::writer::MoodLogWriter;
    use chrono::{Duration, TimeZone, Utc};

    #[tokio::test]
    async fn newest_first_and_limited() {
        let store = Arc::new(InMemoryDocumentStore::new().with_max_page_size(2));
        let writer = MoodLogWriter::new(store.clone());
        let history = MoodHistoryReader::with_page_size(store, 2);
        let token = CancellationToken::new();

        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        // Written out of order, as a client with a skewed clock might.
        for (offset, mood) in [(2, "Sad"), (0, "Happy"), (3, "Excited"), (1, "Anxious")] {
            writer
                .append(
                    MoodObservationInput::new("u1", mood).at(base + Duration::hours(offset)),
                    &token,
                )
                .await
                .unwrap();
        }

        let recent = history.recent("u1", 3, &token).await.unwrap();
        let moods: Vec<&str> = recent.iter().map(|o| o.mood.as_str()).collect();
        assert_eq!(moods, vec!["Excited", "Sad", "Anxious"]);
    }

    #[tokio::test]
    async fn zero_limit_is_invalid() {
        let history = MoodHistoryReader::new(Arc::new(InMemoryDocumentStore::new()));
        let err = history
            .recent("u1", 0, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
    }
}
