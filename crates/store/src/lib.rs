//! Persistence for Scriptorium documents.
//!
//! One pretty-printed JSON file per save, named
//! `{%Y%m%d_%H%M%S}_{id}.json`, in a single history directory. Records are
//! never rewritten; saving an edited document creates a new file.

pub mod file_store;
pub mod record;

pub use file_store::FileStore;
pub use record::DocumentRecord;
