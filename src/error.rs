//! Error types for the symsearch library.
//!
//! All failures are represented by the [`SymSearchError`] enum. The variants
//! mirror the failure taxonomy of the engine: inference before training,
//! artifact problems at load time, and invalid caller input.
//!
//! # Examples
//!
//! ```
//! use symsearch::error::{SymSearchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SymSearchError::invalid_input("query must not be empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for symsearch operations.
#[derive(Error, Debug)]
pub enum SymSearchError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Inference was attempted before the classifier was trained.
    #[error("Not trained: {0}")]
    NotTrained(String),

    /// A loaded classifier's dimensions disagree with the loaded vocabulary.
    #[error("Vocabulary mismatch: {0}")]
    VocabularyMismatch(String),

    /// An expected model artifact resource is absent.
    #[error("Missing artifact: {0}")]
    MissingArtifact(String),

    /// A model artifact resource exists but its contents are inconsistent.
    #[error("Corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// Caller-supplied input was rejected before reaching the engine.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An operation was called out of phase (e.g. matrix build before
    /// vocabulary finalization).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SymSearchError.
pub type Result<T> = std::result::Result<T, SymSearchError>;

impl SymSearchError {
    /// Create a new not-trained error.
    pub fn not_trained<S: Into<String>>(msg: S) -> Self {
        SymSearchError::NotTrained(msg.into())
    }

    /// Create a new vocabulary mismatch error.
    pub fn vocabulary_mismatch<S: Into<String>>(msg: S) -> Self {
        SymSearchError::VocabularyMismatch(msg.into())
    }

    /// Create a new missing artifact error.
    pub fn missing_artifact<S: Into<String>>(msg: S) -> Self {
        SymSearchError::MissingArtifact(msg.into())
    }

    /// Create a new corrupt artifact error.
    pub fn corrupt_artifact<S: Into<String>>(msg: S) -> Self {
        SymSearchError::CorruptArtifact(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        SymSearchError::InvalidInput(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        SymSearchError::InvalidOperation(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        SymSearchError::Other(format!("Internal error: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SymSearchError::Other(msg.into())
    }
}
