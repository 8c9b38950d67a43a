//! Error types for the ledgerdig-core library.
//!
//! Only whole-file and output failures are represented here. A candidate that
//! fails to decode inside a scan is never an error: the scanners drop it and
//! move on to the next offset.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ledgerdig operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all ledgerdig operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File is too short to hold a file control header
    #[error("file header truncated: have {len} bytes, need {needed}")]
    TruncatedHeader {
        /// Bytes available
        len: usize,
        /// Bytes required
        needed: usize,
    },

    /// Failed to serialize a CSV table
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to serialize a JSON document
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A record source could not produce results
    #[error("record source unavailable: {0}")]
    SourceUnavailable(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new truncated header error
    pub fn truncated_header(len: usize, needed: usize) -> Self {
        Self::TruncatedHeader { len, needed }
    }

    /// Creates a new source unavailable error
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Creates a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this error only degrades the result and extraction
    /// should continue with whatever else is available
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::TruncatedHeader { .. } | Self::SourceUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::truncated_header(12, 32);
        assert!(err.to_string().contains("12 bytes"));
        assert!(err.to_string().contains("need 32"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::source_unavailable("driver").is_recoverable());
        assert!(Error::truncated_header(0, 32).is_recoverable());
        assert!(!Error::internal("boom").is_recoverable());
        assert!(!Error::directory_create(
            "/out",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
        )
        .is_recoverable());
    }
}
