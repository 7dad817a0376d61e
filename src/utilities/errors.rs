//! Error types for the agent and its persistent store.

use thiserror::Error;

/// Errors raised by a [`Store`](crate::memory::storage::Store) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying SQLite call failed.
    #[error("Database operation error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("Database connection error: {message}")]
    ConnectionError { message: String },

    /// A stored row could not be decoded.
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    /// Creating the database directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by [`SelfLearningAgent`](crate::agent::SelfLearningAgent) operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Underlying store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A feedback signal other than `positive` or `negative`.
    #[error("Unknown feedback signal: {0:?}")]
    UnknownFeedback(String),

    /// Feedback was given for an interaction that no longer exists.
    #[error("Interaction not found: {0}")]
    InteractionNotFound(i64),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
