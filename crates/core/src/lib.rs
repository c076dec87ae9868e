//! # Scriptorium Core
//!
//! Domain types, traits, and error definitions for Scriptorium, the
//! section-by-section academic essay drafter.
//!
//! Every external collaborator (the hosted model, the document store) is
//! defined as a trait here. Implementations live in their own crates:
//! - `scriptorium-providers` implements [`Provider`]
//! - `scriptorium-store` implements [`DocumentStore`]

pub mod document;
pub mod error;
pub mod provider;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use document::{AcademicLevel, CitationStyle, Document, Section};
pub use error::{Error, ProviderError, Result, StoreError};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use store::{DocumentStore, HistoryEntry};
