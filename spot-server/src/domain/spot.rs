//! Spot types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;
use super::coord::{Coord, decode_location};

/// Stay time assumed for a spot with no `avg_stay_minutes`.
pub const DEFAULT_STAY_MINUTES: u32 = 60;

/// Opaque, non-empty spot identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpotId(String);

impl SpotId {
    /// Parse a spot id, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::EmptySpotId);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SpotId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<SpotId> for String {
    fn from(id: SpotId) -> Self {
        id.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spot category, as offered by the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Subculture,
    Retro,
    Craft,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Subculture, Category::Retro, Category::Craft];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Subculture => "Subculture",
            Category::Retro => "Retro",
            Category::Craft => "Craft",
        }
    }

    /// Parse a category name case-insensitively.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of a spot.
///
/// Values other than the known ones are kept verbatim in `Unknown` so a
/// record written by a newer editor still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpotStatus {
    Published,
    OnHold,
    Closed,
    Unknown(String),
}

impl SpotStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SpotStatus::Published => "published",
            SpotStatus::OnHold => "on_hold",
            SpotStatus::Closed => "closed",
            SpotStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for SpotStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "published" => SpotStatus::Published,
            "on_hold" => SpotStatus::OnHold,
            "closed" => SpotStatus::Closed,
            _ => SpotStatus::Unknown(raw),
        }
    }
}

impl From<SpotStatus> for String {
    fn from(status: SpotStatus) -> Self {
        match status {
            SpotStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A point of interest.
///
/// Spots are maintained by content administrators and read-only here.
/// `location` holds the encoded coordinate text exactly as stored; use
/// [`Spot::coord`] to decode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub spot_id: SpotId,
    pub name_en: String,
    pub name_jp: String,
    pub category: Category,
    pub difficulty: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_stay_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SpotStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Spot {
    /// Create a spot with the required fields; optional fields are empty.
    pub fn new(spot_id: SpotId, name_en: impl Into<String>, category: Category) -> Self {
        Self {
            spot_id,
            name_en: name_en.into(),
            name_jp: String::new(),
            category,
            difficulty: 1,
            avg_stay_minutes: None,
            location: None,
            status: None,
            description: None,
            address: None,
            image_url: None,
            tags: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_stay(mut self, minutes: u32) -> Self {
        self.avg_stay_minutes = Some(minutes);
        self
    }

    pub fn with_status(mut self, status: SpotStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Decoded coordinates, or `None` if the spot cannot be placed.
    pub fn coord(&self) -> Option<Coord> {
        self.location.as_deref().and_then(decode_location)
    }

    /// Stay time in minutes, defaulting when absent.
    pub fn stay_minutes(&self, default: u32) -> u32 {
        self.avg_stay_minutes.unwrap_or(default)
    }

    /// Whether the spot should be shown to the public.
    ///
    /// Records without a status predate status tracking and count as published.
    pub fn is_published(&self) -> bool {
        matches!(self.status, None | Some(SpotStatus::Published))
    }

    /// Validate the difficulty range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(1..=5).contains(&self.difficulty) {
            return Err(DomainError::InvalidDifficulty(self.difficulty));
        }
        Ok(())
    }
}
