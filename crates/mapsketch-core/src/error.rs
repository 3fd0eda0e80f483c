//! Error handling for MapSketch
//!
//! The engine degrades gracefully on most anomalies (missing geometry,
//! projection failures, non-finite measurements); the errors here cover the
//! cases that must surface to the caller, chiefly the persistence boundary.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for MapSketch
#[derive(Error, Debug)]
pub enum Error {
    /// Persisted sketch payload carries a version this build cannot read
    #[error("unsupported sketch payload version {found} (supported: {oldest} through {newest})")]
    UnsupportedVersion {
        /// The version found in the payload.
        found: u32,
        /// The oldest version the importer accepts.
        oldest: u32,
        /// The newest version the importer accepts.
        newest: u32,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a payload version mismatch
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, Error::UnsupportedVersion { .. })
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
