//! Error types for the journal and its storage backends.

use thiserror::Error;

/// Failure of the key-value store the journal persists into.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// Errors surfaced by [`crate::journal::Journal`] operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// A required text field was empty after trimming.
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    /// The operation referenced an entity that does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    /// Reading or writing the persisted journal failed. In-memory state is
    /// left as it was after the mutation.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),

    #[error("failed to encode journal: {0}")]
    Encode(#[from] serde_json::Error),
}

impl JournalError {
    /// True for errors raised by the durable write/read rather than by the
    /// request itself.
    pub fn is_persistence(&self) -> bool {
        matches!(self, JournalError::Persistence(_) | JournalError::Encode(_))
    }
}

pub type JournalResult<T> = Result<T, JournalError>;
