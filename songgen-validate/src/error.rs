//! Error types for songgen-validate
//!
//! Only run-level failures are errors. Problems inside individual records
//! are reported as [`crate::diagnostics::Diagnostic`] values instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal validation run error
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Input file does not exist
    #[error("File '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    /// Input file could not be opened or read
    #[error("Cannot read '{}': {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output or export file could not be written
    #[error("Cannot write '{}': {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be encoded
    #[error("Cannot encode report: {0}")]
    Encode(#[from] serde_json::Error),

    /// songgen-common error (configuration)
    #[error(transparent)]
    Common(#[from] songgen_common::Error),
}

/// Result type for validation runs
pub type ValidateResult<T> = Result<T, ValidateError>;
