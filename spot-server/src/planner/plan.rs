//! The route construction pipeline.
//!
//! sequence → resolve legs → aggregate, for one set of selected spots.

use crate::domain::{RouteData, Spot, SpotId};

use super::aggregate::aggregate;
use super::config::RouteConfig;
use super::legs::{DirectionsProvider, LegResolver};
use super::sequence::{RouteError, sequence};

/// Outcome of planning a route.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    /// The itinerary, ready to display or save.
    pub route: RouteData,

    /// Selected spots the sequencer could not place.
    pub unplaced: Vec<SpotId>,

    /// Consecutive pairs for which no leg could be resolved.
    pub dropped_legs: usize,
}

/// Route planner.
///
/// Holds no state between calls; every `plan` is independent.
pub struct RoutePlanner<'a, P: DirectionsProvider> {
    provider: &'a P,
    config: &'a RouteConfig,
}

impl<'a, P: DirectionsProvider> RoutePlanner<'a, P> {
    /// Create a new planner.
    pub fn new(provider: &'a P, config: &'a RouteConfig) -> Self {
        Self { provider, config }
    }

    /// Build an itinerary for `spots`, starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidStart`] if `start` is not among `spots`.
    /// Provider failures never fail the plan; affected legs are omitted.
    #[tracing::instrument(skip(self, spots), fields(spots = spots.len()))]
    pub async fn plan(&self, spots: &[Spot], start: &SpotId) -> Result<PlannedRoute, RouteError> {
        let seq = sequence(spots, start)?;
        if !seq.is_complete() {
            tracing::warn!(
                unplaced = seq.unplaced.len(),
                "some selected spots have no usable location"
            );
        }

        let legs = LegResolver::new(self.provider).resolve_legs(&seq.stops).await;
        let dropped_legs = seq.stops.len().saturating_sub(1) - legs.len();

        let unplaced = seq.unplaced.iter().map(|s| s.spot_id.clone()).collect();
        let route = aggregate(seq.stops, legs, start.clone(), self.config.default_stay_mins);

        tracing::info!(
            stops = route.stops.len(),
            legs = route.legs.len(),
            total_duration = route.total_duration,
            total_distance = route.total_distance,
            "planned route"
        );

        Ok(PlannedRoute {
            route,
            unplaced,
            dropped_legs,
        })
    }
}
