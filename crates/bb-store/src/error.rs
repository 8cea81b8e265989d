//! Error types for the document store.

use std::path::PathBuf;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the backing file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file exists but could not be read.
    #[error("storage unavailable: cannot read {}: {source}", .path.display())]
    Unavailable {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file was read but is not a valid document.
    #[error("storage corrupt: cannot parse {}: {source}", .path.display())]
    Corrupt {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be written (permissions, disk full, missing directory).
    #[error("storage write failed for {}: {source}", .path.display())]
    WriteFailed {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
