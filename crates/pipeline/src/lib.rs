//! Scriptorium generation pipeline.
//!
//! A topic becomes a [`Document`](scriptorium_core::Document) in five
//! sequential model calls:
//!
//! ```text
//! title -> introduction -> body -> conclusion
//!                               \-> references
//! ```
//!
//! The [`Assembler`] runs the whole sequence; the [`SectionEditor`] reworks
//! one section of an existing document.

pub mod assembler;
pub mod client;
pub mod editor;
pub mod generators;
pub mod prompts;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use assembler::Assembler;
pub use client::ModelClient;
pub use editor::{LengthBand, SectionEditor};
