//! Itinerary types.

use serde::{Deserialize, Serialize};

use super::{RouteLeg, Spot, SpotId};

/// A stop in an itinerary.
///
/// `is_deleted` is set when a reloaded route references a spot that no
/// longer exists or is no longer public. The stop stays in place so the
/// saved itinerary is still shown as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    #[serde(flatten)]
    pub spot: Spot,
    #[serde(default)]
    pub is_deleted: bool,
}

impl RouteStop {
    pub fn new(spot: Spot) -> Self {
        Self {
            spot,
            is_deleted: false,
        }
    }

    pub fn spot_id(&self) -> &SpotId {
        &self.spot.spot_id
    }
}

impl From<Spot> for RouteStop {
    fn from(spot: Spot) -> Self {
        Self::new(spot)
    }
}

/// A complete itinerary: ordered stops, legs between them, and totals.
///
/// # Invariants
///
/// - `legs[i]` connects `stops[i]` to `stops[i + 1]` unless a leg could not
///   be resolved, in which case it is absent and `legs` is shorter.
/// - `legs.len() <= stops.len().saturating_sub(1)`
/// - `total_duration` counts every stay plus every present leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    pub stops: Vec<RouteStop>,
    pub legs: Vec<RouteLeg>,
    /// Minutes.
    pub total_duration: u32,
    /// Meters.
    pub total_distance: u64,
    pub start_spot_id: SpotId,
}

impl RouteData {
    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Legs that a complete resolution would have produced but are absent.
    pub fn missing_legs(&self) -> usize {
        self.stops
            .len()
            .saturating_sub(1)
            .saturating_sub(self.legs.len())
    }

    /// Stops flagged by revalidation.
    pub fn deleted_stops(&self) -> impl Iterator<Item = &RouteStop> {
        self.stops.iter().filter(|s| s.is_deleted)
    }

    /// Whether any stop is flagged as deleted.
    pub fn has_deleted_stops(&self) -> bool {
        self.stops.iter().any(|s| s.is_deleted)
    }

    pub fn stop_ids(&self) -> Vec<SpotId> {
        self.stops.iter().map(|s| s.spot.spot_id.clone()).collect()
    }
}
