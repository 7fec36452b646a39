//! Error types for parameter records

use thiserror::Error;

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, ParamsError>;

/// Errors that can occur while handling parameter records
///
/// Field values themselves are never rejected; only names and buffers are.
#[derive(Error, Debug)]
pub enum ParamsError {
    /// Storage layer error (malformed layout buffer, I/O)
    #[error("Storage error: {source}")]
    Storage {
        #[from]
        /// Source storage error
        source: nsat_storage::StorageError,
    },

    /// Field name not present in the record layout
    #[error("Unknown field '{field}' for {record} record")]
    UnknownField {
        /// Requested field name
        field: String,
        /// Record variant
        record: &'static str,
    },

    /// Two populations share a name
    #[error("Duplicate population name '{name}'")]
    DuplicatePopulation {
        /// Repeated name
        name: String,
    },
}

impl ParamsError {
    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>, record: &'static str) -> Self {
        Self::UnknownField {
            field: field.into(),
            record,
        }
    }

    /// Create a duplicate population error
    pub fn duplicate_population(name: impl Into<String>) -> Self {
        Self::DuplicatePopulation { name: name.into() }
    }
}
