//! Saved journeys.
//!
//! A `Journey` is a named `RouteData` owned by one user. Journeys are
//! created on save and deleted by their owner; they are never edited.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DomainError, RouteData};

/// Identifier of a saved journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyId(Uuid);

impl JourneyId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidJourneyId(s.to_string()))
    }
}

impl fmt::Display for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque identifier of the user owning a journey.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::EmptyUserId);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted, named itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub journey_id: JourneyId,
    pub user_id: UserId,
    pub title: String,
    pub route_json: RouteData,
    pub created_at: DateTime<Utc>,
}

impl Journey {
    /// Create a new journey stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] if the title is blank.
    pub fn new(user_id: UserId, title: &str, route: RouteData) -> Result<Self, DomainError> {
        Self::new_at(user_id, title, route, Utc::now())
    }

    /// Create a new journey with an explicit creation time.
    pub fn new_at(
        user_id: UserId,
        title: &str,
        route: RouteData,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }

        Ok(Self {
            journey_id: JourneyId::generate(),
            user_id,
            title: title.to_string(),
            route_json: route,
            created_at,
        })
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }
}
