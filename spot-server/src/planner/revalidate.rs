//! Revalidation of saved routes.
//!
//! Spots can be removed or taken down after a route was saved. On reload
//! each stop is checked against a pre-fetched status index and flagged,
//! but the saved itinerary itself is left as it was.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{RouteData, SpotId};

/// Status of a spot as reported by the spot store.
///
/// `status` is the raw stored value. It is absent on records created
/// before statuses were tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusRecord {
    pub fn new(status: Option<&str>) -> Self {
        Self {
            status: status.map(str::to_string),
        }
    }

    /// Published, or no status at all.
    pub fn is_visible(&self) -> bool {
        matches!(self.status.as_deref(), None | Some("published"))
    }
}

/// Existence and status of spots, keyed by id.
pub type StatusIndex = HashMap<SpotId, StatusRecord>;

/// Flag stops that no longer exist or are no longer public.
///
/// A stop is flagged when its id is missing from `index`, or its record
/// carries any status other than `"published"`. Stops are not removed or
/// reordered and totals are not recomputed.
pub fn revalidate(mut saved: RouteData, index: &StatusIndex) -> RouteData {
    for stop in &mut saved.stops {
        stop.is_deleted = !index
            .get(&stop.spot.spot_id)
            .is_some_and(StatusRecord::is_visible);
    }
    saved
}
