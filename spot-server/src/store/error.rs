//! Journey store error types.

use crate::domain::JourneyId;

/// Errors from a journey store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No such journey for this user
    #[error("journey {0} not found")]
    NotFound(JourneyId),

    /// Owner already has the maximum number of saved journeys
    #[error("saved journey limit reached ({limit}); delete one first")]
    LimitReached { limit: usize },

    /// Backing storage could not be read or written
    #[error("storage error: {message}")]
    Io { message: String },

    /// Stored data could not be (de)serialized
    #[error("JSON error: {message}")]
    Json { message: String },
}
