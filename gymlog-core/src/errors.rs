use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Failures raised while talking to the exercise store.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum StoreError {
    #[error("failed to prepare store directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open store {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: diesel::result::ConnectionError,
    },
    #[error("store statement failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    #[error("record rejected: {0}")]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    /// Integrity problems mean the file was edited outside the application and
    /// must never be papered over with a default.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Integrity(_))
    }
}

/// A stored row that cannot be turned back into an exercise record.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum IntegrityError {
    #[error("exercise #{id} has a stored date {value:?} that is not an ISO calendar date")]
    CorruptDate { id: i32, value: String },
    #[error("exercise #{id} has an unknown muscle group {value:?}")]
    UnknownGroup { id: i32, value: String },
}

/// Rejected user input. The message is meant to be shown as-is.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("Please enter the exercise name.")]
    BlankName,
    #[error("Unknown muscle group: {0}")]
    UnknownGroup(String),
    #[error("Please enter a valid weight.")]
    InvalidWeight,
    #[error("Please enter a valid number of repetitions.")]
    InvalidRepetitions,
    #[error("Repetitions must be greater than 0.")]
    NonPositiveRepetitions,
    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDate,
}
