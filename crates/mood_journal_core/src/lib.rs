pub mod aggregator;
pub mod coping;
pub mod domain;
pub mod history;
pub mod journal;
pub mod memory;
pub mod ports;
pub mod schema;
pub mod writer;

mod scan;

pub use aggregator::MoodStatsAggregator;
pub use domain::{
    DocumentId, JournalEntryId, JournalEntryInput, MoodCount, MoodObservation, MoodObservationId,
    MoodObservationInput, MoodStatsReport, KNOWN_MOODS,
};
pub use history::MoodHistoryReader;
pub use journal::JournalWriter;
pub use memory::InMemoryDocumentStore;
pub use ports::{Document, DocumentStore, Filter, FilterOp, Page, PageRequest, PortError, PortResult};
pub use writer::MoodLogWriter;
