//! Error kinds for loading, normalizing and classifying benchmark results

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the reporting pipeline
#[derive(Error, Debug)]
pub enum ReportError {
    /// File content could not be decoded (bad JSON/XML syntax, bad UTF-8)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Content decoded but required structure is missing or unrecognized
    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    /// In-memory data handed to the classifier breaks a structural contract
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// Invalid invocation or configuration, detected before processing
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Whether the batch may continue after this error.
    ///
    /// File-level failures skip the offending file; contract and
    /// configuration failures abort the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReportError::MalformedInput(_) | ReportError::SchemaValidation(_) | ReportError::Io { .. }
        )
    }
}

/// Result type for the reporting pipeline
pub type Result<T> = std::result::Result<T, ReportError>;
