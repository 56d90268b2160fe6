//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during session store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The session was already started when an operation required it stopped.
    #[error("session already started: cannot perform `{operation}`")]
    AlreadyStarted {
        /// Static label of the operation that was rejected.
        operation: &'static str,
    },

    /// The session was not started when an operation required it running.
    #[error("session not started: cannot perform `{operation}`")]
    NotStarted {
        /// Static label of the operation that was rejected.
        operation: &'static str,
    },

    /// A start option key is not on the allow-list.
    #[error("invalid session start option: `{key}`")]
    InvalidOption {
        /// The rejected option key.
        key: String,
    },
}

impl StoreError {
    /// Creates an already-started error for the given call site.
    #[must_use]
    pub fn already_started(operation: &'static str) -> Self {
        Self::AlreadyStarted { operation }
    }

    /// Creates a not-started error for the given call site.
    #[must_use]
    pub fn not_started(operation: &'static str) -> Self {
        Self::NotStarted { operation }
    }

    /// Creates an invalid-option error for the given key.
    pub fn invalid_option(key: impl Into<String>) -> Self {
        Self::InvalidOption { key: key.into() }
    }
}
