//! Store error handling
//!
//! Provides typed errors for store operations with descriptive messages
//! and recovery suggestions.

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Opening, querying or writing the database failed
    #[error("Storage unavailable: {context}: {source}")]
    StorageUnavailable {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// An id argument fell outside `[1, len]`
    #[error("Bookmark id {id} out of range (1-{len})")]
    OutOfRange { id: u16, len: u16 },

    /// Adding would exceed the store capacity
    #[error("Maximum number of bookmarks ({max}) reached")]
    CapacityExceeded { max: u16 },

    /// A bookmark URL was empty
    #[error("Bookmark URL must not be empty")]
    EmptyUrl,

    /// The database location is not a plain file path
    #[error("Unsupported database path {path:?}: expected a file on disk")]
    UnsupportedPath { path: String },
}

impl StoreError {
    /// Wrap a database error with a short description of what was attempted
    pub fn storage(context: impl Into<String>, source: rusqlite::Error) -> Self {
        StoreError::StorageUnavailable {
            context: context.into(),
            source,
        }
    }

    /// Check if the caller can fix this error by changing its input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StoreError::OutOfRange { .. }
                | StoreError::CapacityExceeded { .. }
                | StoreError::EmptyUrl
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::OutOfRange { .. } => {
                Some("Reload the bookmark list; ids shift down when a bookmark is removed.")
            }
            StoreError::CapacityExceeded { .. } => {
                Some("Remove bookmarks you no longer need before adding new ones.")
            }
            StoreError::EmptyUrl => None,
            StoreError::UnsupportedPath { .. } => {
                Some("Point db_path at a database file; in-memory and URI databases cannot be bulk loaded.")
            }
            StoreError::StorageUnavailable { .. } => {
                Some("Check that the database path exists and is a readable buku database.")
            }
        }
    }
}

/// Extension for attaching store context to `rusqlite` results
pub(crate) trait StorageContext<T> {
    fn storage_context(self, context: &str) -> StoreResult<T>;
}

impl<T> StorageContext<T> for Result<T, rusqlite::Error> {
    fn storage_context(self, context: &str) -> StoreResult<T> {
        self.map_err(|e| StoreError::storage(context, e))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
