//! crates/mood_journal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or transport format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The moods offered by the client. The vocabulary is open: other labels are
/// accepted and stored as-is.
pub const KNOWN_MOODS: [&str; 4] = ["Happy", "Sad", "Anxious", "Excited"];

pub fn is_known_mood(mood: &str) -> bool {
    KNOWN_MOODS.contains(&mood)
}

/// Opaque, store-assigned identity of a persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type MoodObservationId = DocumentId;
pub type JournalEntryId = DocumentId;

/// A request to log a mood. `timestamp` is assigned at write time when absent.
#[derive(Debug, Clone)]
pub struct MoodObservationInput {
    pub user_id: String,
    pub mood: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl MoodObservationInput {
    pub fn new(user_id: impl Into<String>, mood: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            mood: mood.into(),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// One immutable mood-logging event, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodObservation {
    pub id: MoodObservationId,
    pub user_id: String,
    pub mood: String,
    pub timestamp: DateTime<Utc>,
}

/// A single row of a stats report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCount {
    pub mood: String,
    pub count: u64,
}

/// Per-mood counts for one user, ordered by count descending then label ascending.
/// Derived on demand and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodStatsReport {
    pub entries: Vec<MoodCount>,
}

impl MoodStatsReport {
    /// Number of observations the report was built from.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn count_for(&self, mood: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.mood == mood).map(|e| e.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A free-text journal entry to persist.
#[derive(Debug, Clone)]
pub struct JournalEntryInput {
    pub user_id: String,
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
}
