//! Error types for segment operations.

use thiserror::Error;

/// Result type for segment operations.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors that can occur while constructing a session segment.
///
/// Only construction can fail. Every method on an already-constructed
/// [`Segment`](crate::Segment) degrades gracefully instead of erroring.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// The segment name was empty.
    #[error("segment name must not be empty")]
    EmptySegmentName,

    /// The store could not be brought to a started state.
    #[error("could not start the session store for segment `{segment_name}`")]
    NotStarted {
        /// Name of the segment being constructed.
        segment_name: String,
    },

    /// The store rejected the start attempt outright.
    #[error("store error: {0}")]
    Store(#[from] sesskit_store::StoreError),
}

impl SegmentError {
    /// Creates a not-started error for the named segment.
    pub fn not_started(segment_name: impl Into<String>) -> Self {
        Self::NotStarted {
            segment_name: segment_name.into(),
        }
    }
}
