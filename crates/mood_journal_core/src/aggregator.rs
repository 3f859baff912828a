//! crates/mood_journal_core/src/aggregator.rs
//!
//! Reduces a user's mood observations into an ordered per-mood count report.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::{MoodCount, MoodStatsReport};
use crate::ports::{DocumentStore, Filter, PortResult};
use crate::scan::drain;
use crate::schema::{mood_label, require_non_empty, FIELD_USER_ID, MOOD_LOGS};

/// Page size requested from the store while draining a user's observations.
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Clone)]
pub struct MoodStatsAggregator {
    store: Arc<dyn DocumentStore>,
    page_size: usize,
}

impl MoodStatsAggregator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: Arc<dyn DocumentStore>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Counts every observation for `user_id`, across all result pages.
    ///
    /// Labels are compared by exact string equality, so "happy" and "Happy"
    /// are separate rows. A user with no observations yields an empty report.
    /// A failed or cancelled page fails the whole call.
    pub async fn compute(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> PortResult<MoodStatsReport> {
        require_non_empty("userId", user_id)?;

        let filter = Filter::eq(FIELD_USER_ID, user_id);
        let mut counts: HashMap<String, u64> = HashMap::new();

        let pages = drain(
            self.store.as_ref(),
            MOOD_LOGS,
            &filter,
            self.page_size,
            cancel,
            |doc| {
                let mood = mood_label(&doc)?;
                match counts.get_mut(mood) {
                    Some(count) => *count += 1,
                    None => {
                        counts.insert(mood.to_string(), 1);
                    }
                }
                Ok(())
            },
        )
        .await?;

        let report = into_report(counts);
        debug!(user_id, pages, "Drained mood observations");
        info!(
            user_id,
            moods = report.len(),
            observations = report.total(),
            "Mood stats computed"
        );
        Ok(report)
    }
}

/// Orders counts by count descending, ties broken by label ascending.
fn into_report(counts: HashMap<String, u64>) -> MoodStatsReport {
    let mut entries: Vec<MoodCount> = counts
        .into_iter()
        .map(|(mood, count)| MoodCount { mood, count })
        .collect();
    entries.sort_by(|a, b| {
        Reverse(a.count)
            .cmp(&Reverse(b.count))
            .then_with(|| a.mood.cmp(&b.mood))
    });
    MoodStatsReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentId, MoodObservationInput};
    use crate::memory::InMemoryDocumentStore;
    use crate::ports::{Page, PageRequest, PortError};
    use crate::writer::MoodLogWriter;
    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn log(writer: &MoodLogWriter, user: &str, mood: &str) {
        writer
            .append(MoodObservationInput::new(user, mood), &CancellationToken::new())
            .await
            .unwrap();
    }

    fn pair(mood: &str, count: u64) -> MoodCount {
        MoodCount {
            mood: mood.to_string(),
            count,
        }
    }

    #[tokio::test]
    async fn counts_are_ordered_by_count_then_label() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let writer = MoodLogWriter::new(store.clone());
        let stats = MoodStatsAggregator::new(store);

        log(&writer, "u1", "Happy").await;
        log(&writer, "u1", "Sad").await;
        log(&writer, "u1", "Happy").await;
        log(&writer, "u2", "Anxious").await;

        let report = stats.compute("u1", &CancellationToken::new()).await.unwrap();
        assert_eq!(report.entries, vec![pair("Happy", 2), pair("Sad", 1)]);
    }

    #[tokio::test]
    async fn ties_sort_lexically_and_labels_are_case_sensitive() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let writer = MoodLogWriter::new(store.clone());
        let stats = MoodStatsAggregator::new(store);

        for mood in ["Sad", "happy", "Excited", "Happy", "Sad", "Excited"] {
            log(&writer, "u1", mood).await;
        }

        let report = stats.compute("u1", &CancellationToken::new()).await.unwrap();
        assert_eq!(
            report.entries,
            vec![
                pair("Excited", 2),
                pair("Sad", 2),
                pair("Happy", 1),
                pair("happy", 1),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_user_gets_an_empty_report() {
        let stats = MoodStatsAggregator::new(Arc::new(InMemoryDocumentStore::new()));
        let report = stats.compute("nobody", &CancellationToken::new()).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.total(), 0);
    }

    #[tokio::test]
    async fn empty_user_id_is_invalid() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let stats = MoodStatsAggregator::new(store.clone());
        let err = stats.compute("", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn drains_every_page() {
        let store = Arc::new(InMemoryDocumentStore::new().with_max_page_size(100));
        let writer = MoodLogWriter::new(store.clone());
        let stats = MoodStatsAggregator::new(store.clone());

        let moods = ["Happy", "Sad", "Anxious", "Excited", "Calm"];
        for i in 0..250 {
            log(&writer, "u1", moods[i % moods.len()]).await;
        }

        let report = stats.compute("u1", &CancellationToken::new()).await.unwrap();
        assert_eq!(report.total(), 250);
        assert_eq!(report.len(), 5);
        for mood in moods {
            assert_eq!(report.count_for(mood), Some(50));
        }
        assert_eq!(report.count_for("happy"), None);
        assert_eq!(store.query_count(), 3);
    }

    #[tokio::test]
    async fn repeated_calls_return_identical_reports() {
        let store = Arc::new(InMemoryDocumentStore::new().with_max_page_size(7));
        let writer = MoodLogWriter::new(store.clone());
        let stats = MoodStatsAggregator::with_page_size(store, 7);

        for (i, mood) in ["A", "B", "C", "D"].iter().cycle().take(30).enumerate() {
            log(&writer, "u1", mood).await;
            if i % 3 == 0 {
                log(&writer, "u1", "Z").await;
            }
        }

        let token = CancellationToken::new();
        let reports =
            futures::future::join_all((0..4).map(|_| stats.compute("u1", &token))).await;
        let first = reports[0].as_ref().unwrap();
        for report in &reports {
            assert_eq!(report.as_ref().unwrap(), first);
        }
    }

    #[tokio::test]
    async fn failure_mid_drain_fails_the_whole_call() {
        let store = Arc::new(InMemoryDocumentStore::new().with_max_page_size(10));
        let writer = MoodLogWriter::new(store.clone());
        let stats = MoodStatsAggregator::with_page_size(store.clone(), 10);

        for _ in 0..25 {
            log(&writer, "u1", "Happy").await;
        }
        store.fail_query_at(2);

        let err = stats.compute("u1", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, PortError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn undecodable_document_fails_the_call() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut fields = Map::new();
        fields.insert(FIELD_USER_ID.to_string(), Value::from("u1"));
        fields.insert("mood".to_string(), Value::from(7));
        store.write(MOOD_LOGS, fields).await.unwrap();

        let stats = MoodStatsAggregator::new(store);
        let err = stats.compute("u1", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }

    /// Serves fixed pages and cancels `token` while serving the `cancel_at`th one.
    struct CancellingStore {
        token: CancellationToken,
        cancel_at: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for CancellingStore {
        async fn write(&self, _: &str, _: Map<String, Value>) -> PortResult<DocumentId> {
            Err(PortError::Unexpected("read-only".into()))
        }

        async fn query(&self, _: &str, _: &Filter, page: PageRequest) -> PortResult<Page> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.cancel_at {
                self.token.cancel();
            }
            let mut fields = Map::new();
            fields.insert("mood".to_string(), Value::from("Happy"));
            Ok(Page {
                documents: vec![crate::ports::Document {
                    id: DocumentId(format!("{call}")),
                    fields,
                }],
                next_cursor: (call < 5).then(|| format!("{}", page.limit * call)),
            })
        }
    }

    #[tokio::test]
    async fn cancellation_mid_drain_reports_cancelled() {
        let token = CancellationToken::new();
        let store = Arc::new(CancellingStore {
            token: token.clone(),
            cancel_at: 2,
            calls: AtomicUsize::new(0),
        });
        let stats = MoodStatsAggregator::with_page_size(store.clone(), 1);

        let err = stats.compute("u1", &token).await.unwrap_err();
        assert!(matches!(err, PortError::Cancelled));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }
}
