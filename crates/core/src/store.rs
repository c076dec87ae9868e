//! DocumentStore trait — durable storage for generated works.
//!
//! Records are immutable once written: every save creates a new record,
//! so a document's history is the sequence of files it was saved to.

use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::document::{AcademicLevel, CitationStyle, Document};
use crate::error::StoreError;

/// One line of the history index.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: Option<String>,
    pub title: String,
    pub topic: String,
    pub level: AcademicLevel,
    pub style: CitationStyle,
    pub created_at: Option<NaiveDateTime>,

    /// Record location; pass it back to `load`.
    pub path: PathBuf,
}

impl HistoryEntry {
    pub fn from_document(document: &Document, path: PathBuf) -> Self {
        Self {
            id: document.id.clone(),
            title: document.title.clone(),
            topic: document.topic.clone(),
            level: document.level,
            style: document.style,
            created_at: document.created_at,
            path,
        }
    }
}

/// The core DocumentStore trait.
///
/// Implementations: JSON files in a history directory.
pub trait DocumentStore: Send + Sync {
    /// The backend name (e.g., "file").
    fn name(&self) -> &str;

    /// Persist a document as a new record and return its storage key.
    ///
    /// Assigns `id` and `created_at` when absent and records the new
    /// location in `source_path`.
    fn save(&self, document: &mut Document) -> std::result::Result<PathBuf, StoreError>;

    /// Read a record back.
    fn load(&self, key: &str) -> std::result::Result<Document, StoreError>;

    /// All readable records, newest first.
    fn list_history(&self) -> std::result::Result<Vec<HistoryEntry>, StoreError>;
}
