//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from provider and storage errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Spot id was blank
    #[error("spot id must not be empty")]
    EmptySpotId,

    /// User id was blank
    #[error("user id must not be empty")]
    EmptyUserId,

    /// Journey id was not a UUID
    #[error("invalid journey id: {0}")]
    InvalidJourneyId(String),

    /// Journey title was blank
    #[error("journey title must not be empty")]
    EmptyTitle,

    /// Category name not recognised
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Difficulty outside 1..=5
    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),
}
