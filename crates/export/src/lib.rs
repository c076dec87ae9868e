//! scriptorium-export
//!
//! Renders a [`Document`] to a paginated A4 PDF. Rendering never fails
//! outright: when the real layout cannot be produced the caller gets a
//! single-line error PDF flagged as [`RenderResult::Degraded`].

pub mod error;
pub mod layout;
pub mod pdf;
pub mod sanitize;

use chrono::NaiveDateTime;
use scriptorium_config::ExportConfig;
use scriptorium_core::Document;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use error::ExportError;

/// Outcome of a render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    Success(Vec<u8>),
    /// The error page, plus why the real layout failed. `bytes` is empty
    /// only if the error page could not be produced either.
    Degraded { bytes: Vec<u8>, reason: String },
}

impl RenderResult {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Success(bytes) | Self::Degraded { bytes, .. } => bytes,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// Render `document` with the configured page style.
pub fn render(document: &Document, style: &ExportConfig) -> RenderResult {
    settle(pdf::render_document(document, style))
}

fn settle(outcome: Result<Vec<u8>, ExportError>) -> RenderResult {
    match outcome {
        Ok(bytes) => RenderResult::Success(bytes),
        Err(e) => {
            let reason = e.to_string();
            warn!(reason = %reason, "PDF export degraded to error page");
            match pdf::render_error_page(&reason) {
                Ok(bytes) => RenderResult::Degraded { bytes, reason },
                Err(fallback) => RenderResult::Degraded {
                    bytes: Vec::new(),
                    reason: format!("{reason}; error page also failed: {fallback}"),
                },
            }
        }
    }
}

/// `{%Y%m%d_%H%M%S}_{id}.pdf`, with `novo` standing in for an unsaved id.
pub fn export_filename(document: &Document, now: NaiveDateTime) -> String {
    format!("{}_{}.pdf", now.format("%Y%m%d_%H%M%S"), document.display_id())
}

/// Write rendered bytes, creating parent directories as needed.
pub fn write_pdf(path: &Path, result: &RenderResult) -> Result<PathBuf, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, result.bytes())?;
    info!(path = %path.display(), degraded = result.is_degraded(), "PDF written");
    Ok(path.to_path_buf())
}
