//! Itinerary totals.

use crate::domain::{RouteData, RouteLeg, RouteStop, Spot, SpotId};

/// Assemble a [`RouteData`] from ordered stops and their resolved legs.
///
/// `total_duration` is every stop's stay (using `default_stay_mins` where a
/// spot has none) plus every leg's travel time. `total_distance` is the sum
/// of leg distances. Missing legs simply contribute nothing. With fewer
/// than two stops there is nothing to travel, so legs are discarded.
pub fn aggregate(
    stops: Vec<Spot>,
    legs: Vec<RouteLeg>,
    start: SpotId,
    default_stay_mins: u32,
) -> RouteData {
    let legs = if stops.len() < 2 { Vec::new() } else { legs };

    let stay: u32 = stops
        .iter()
        .map(|s| s.stay_minutes(default_stay_mins))
        .fold(0u32, u32::saturating_add);
    let travel: u32 = legs
        .iter()
        .map(|l| l.duration_minutes)
        .fold(0u32, u32::saturating_add);
    let total_distance: u64 = legs
        .iter()
        .map(|l| l.distance_meters)
        .fold(0u64, u64::saturating_add);

    RouteData {
        stops: stops.into_iter().map(RouteStop::new).collect(),
        legs,
        total_duration: stay.saturating_add(travel),
        total_distance,
        start_spot_id: start,
    }
}
