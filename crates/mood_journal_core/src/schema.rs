//! crates/mood_journal_core/src/schema.rs
//!
//! Collection names, document field names, and the mapping between documents
//! and domain records.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::MoodObservation;
use crate::ports::{Document, PortError, PortResult};

pub const MOOD_LOGS: &str = "moodLogs";
pub const JOURNAL_ENTRIES: &str = "journalEntries";

pub const FIELD_USER_ID: &str = "userId";
pub const FIELD_MOOD: &str = "mood";
pub const FIELD_TEXT: &str = "text";
pub const FIELD_TIMESTAMP: &str = "timestamp";

/// Fails with `InvalidInput` when `value` is empty or whitespace-only.
pub(crate) fn require_non_empty(name: &str, value: &str) -> PortResult<()> {
    if value.trim().is_empty() {
        return Err(PortError::InvalidInput(format!("{name} must not be empty")));
    }
    Ok(())
}

pub(crate) fn mood_fields(user_id: &str, mood: &str, timestamp: DateTime<Utc>) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(FIELD_USER_ID.to_string(), Value::from(user_id));
    fields.insert(FIELD_MOOD.to_string(), Value::from(mood));
    fields.insert(FIELD_TIMESTAMP.to_string(), Value::from(timestamp.to_rfc3339()));
    fields
}

pub(crate) fn journal_fields(user_id: &str, text: &str, timestamp: DateTime<Utc>) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(FIELD_USER_ID.to_string(), Value::from(user_id));
    fields.insert(FIELD_TEXT.to_string(), Value::from(text));
    fields.insert(FIELD_TIMESTAMP.to_string(), Value::from(timestamp.to_rfc3339()));
    fields
}

fn string_field<'a>(doc: &'a Document, field: &str) -> PortResult<&'a str> {
    doc.fields
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PortError::Unexpected(format!(
                "document {} has a missing or non-string '{}' field",
                doc.id, field
            ))
        })
}

/// Reads only the mood label. The aggregator needs nothing else.
pub(crate) fn mood_label(doc: &Document) -> PortResult<&str> {
    string_field(doc, FIELD_MOOD)
}

impl TryFrom<Document> for MoodObservation {
    type Error = PortError;

    fn try_from(doc: Document) -> PortResult<Self> {
        let user_id = string_field(&doc, FIELD_USER_ID)?.to_string();
        let mood = string_field(&doc, FIELD_MOOD)?.to_string();
        let raw_timestamp = string_field(&doc, FIELD_TIMESTAMP)?;
        let timestamp = DateTime::parse_from_rfc3339(raw_timestamp)
            .map_err(|e| {
                PortError::Unexpected(format!("document {} has a bad timestamp: {}", doc.id, e))
            })?
            .with_timezone(&Utc);

        Ok(MoodObservation {
            id: doc.id,
            user_id,
            mood,
            timestamp,
        })
    }
}
