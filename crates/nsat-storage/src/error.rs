//! Error types for the storage layer

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Malformed binary buffer or text file
    #[error("Invalid format: {reason}")]
    InvalidFormat {
        /// Reason for invalid format
        reason: String
    },

    /// Matrix dimensions differ from the expected population sizes
    #[error("Shape mismatch: expected {expected_rows}x{expected_cols}, found {rows}x{cols}")]
    ShapeMismatch {
        /// Expected number of rows (pre-synaptic neurons)
        expected_rows: usize,
        /// Expected number of columns (post-synaptic neurons)
        expected_cols: usize,
        /// Rows found
        rows: usize,
        /// Columns found
        cols: usize,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        /// Source I/O error
        source: std::io::Error,
    },
}

impl StorageError {
    /// Create an invalid format error
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Whether this is a format (size/alignment/content) error
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. })
    }
}
