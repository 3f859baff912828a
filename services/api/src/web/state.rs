//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use mood_journal_core::ports::{DocumentStore, PortError, PortResult};
use mood_journal_core::{JournalWriter, MoodHistoryReader, MoodLogWriter, MoodStatsAggregator};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mood_writer: MoodLogWriter,
    pub mood_stats: MoodStatsAggregator,
    pub mood_history: MoodHistoryReader,
    pub journal: JournalWriter,
    /// Cancelled when the server begins shutting down; parent of every request token.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wires every core component onto the same document store.
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<Config>, shutdown: CancellationToken) -> Self {
        let page_size = config.query_page_size;
        Self {
            mood_writer: MoodLogWriter::new(store.clone()),
            mood_stats: MoodStatsAggregator::with_page_size(store.clone(), page_size),
            mood_history: MoodHistoryReader::with_page_size(store.clone(), page_size),
            journal: JournalWriter::new(store),
            config,
            shutdown,
        }
    }

    /// A token for one request. Cancelled by server shutdown.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Runs a core operation under the configured request timeout.
    /// An elapsed timeout drops the in-flight call and reports `Cancelled`.
    pub async fn bounded<T, F>(&self, op: F) -> PortResult<T>
    where
        F: Future<Output = PortResult<T>>,
    {
        match tokio::time::timeout(self.config.request_timeout, op).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = self.config.request_timeout.as_millis() as u64,
                    "Request timed out"
                );
                Err(PortError::Cancelled)
            }
        }
    }
}
