//! Error types surfaced by the book store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every way a store operation can fail. The store never swallows or logs a
/// failure itself; callers decide how to report these.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An operation ran before `initialize` (or after `close`).
    #[error("store is not initialized")]
    NotInitialized,

    /// The in-memory engine could not be opened.
    #[error("failed to open in-memory database: {0}")]
    Connection(#[source] rusqlite::Error),

    /// A schema or data script was missing, unreadable, or rejected.
    #[error("script {}: {reason}", path.display())]
    Script { path: PathBuf, reason: String },

    /// An insert collided with an existing primary key.
    #[error("a book with id {0} already exists")]
    DuplicateId(i64),

    /// The engine rejected a statement.
    #[error("statement failed: {0}")]
    Statement(#[from] rusqlite::Error),

    /// The export destination could not be created or written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Caller input could not be turned into typed values.
    #[error("invalid input: {0}")]
    Validation(String),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = StoreError::DuplicateId(7);
        assert_eq!(err.to_string(), "a book with id 7 already exists");

        let err = StoreError::Script {
            path: PathBuf::from("data/seed.sql"),
            reason: "no such table: BOOKS".into(),
        };
        assert!(err.to_string().contains("data/seed.sql"));
        assert!(err.to_string().contains("no such table"));

        assert_eq!(StoreError::NotInitialized.to_string(), "store is not initialized");
    }

    #[test]
    fn rusqlite_errors_become_statement_errors() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Statement(_)));
    }
}
