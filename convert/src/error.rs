//! Fatal conversion errors.
//!
//! Anything recoverable is a [`Diagnostic`](crate::diagnostics::Diagnostic)
//! instead; these variants end a run without producing a document.

use thiserror::Error;

/// Errors that stop a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;
