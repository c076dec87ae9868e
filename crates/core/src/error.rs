//! Error types for the Scriptorium domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Scriptorium operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Caller input ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True when the failure means no usable model credential is configured.
    ///
    /// Callers use this to show setup instructions instead of a raw error.
    pub fn is_configuration(&self) -> bool {
        match self {
            Error::Provider(e) => e.is_configuration(),
            Error::Config { .. } => true,
            _ => false,
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model returned no text: {0}")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Missing or placeholder credential, raised before any network call.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::NotConfigured(_))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {key}")]
    NotFound { key: String },

    #[error("Corrupt record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("Storage I/O error: {0}")]
    Io(String),
}
