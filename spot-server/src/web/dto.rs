//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Journey, JourneyId, RouteData, Spot, SpotId};
use crate::planner::PlannedRoute;

/// Query for the spot listing.
#[derive(Debug, Deserialize)]
pub struct SpotListQuery {
    /// Category name, case-insensitive
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpotListResponse {
    pub spots: Vec<Spot>,
}

/// Map link for one spot.
#[derive(Debug, Serialize)]
pub struct MapLinkResponse {
    pub spot_id: SpotId,
    pub url: String,
}

/// Request to plan a route through selected spots.
#[derive(Debug, Deserialize)]
pub struct PlanRouteRequest {
    pub spot_ids: Vec<String>,
    pub start_spot_id: String,
}

#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    pub route: RouteData,

    /// Selected spots that could not be placed in the sequence
    pub unplaced: Vec<SpotId>,

    /// Consecutive pairs for which no travel leg was found
    pub dropped_legs: usize,
}

impl From<PlannedRoute> for PlanRouteResponse {
    fn from(planned: PlannedRoute) -> Self {
        Self {
            route: planned.route,
            unplaced: planned.unplaced,
            dropped_legs: planned.dropped_legs,
        }
    }
}

/// Request to save a planned route.
#[derive(Debug, Deserialize)]
pub struct SaveJourneyRequest {
    pub title: String,
    pub route: RouteData,
}

/// A saved journey without its route body.
#[derive(Debug, Serialize)]
pub struct JourneySummary {
    pub journey_id: JourneyId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub stop_count: usize,
    pub total_duration: u32,
}

impl From<&Journey> for JourneySummary {
    fn from(journey: &Journey) -> Self {
        Self {
            journey_id: journey.journey_id,
            title: journey.title.clone(),
            created_at: journey.created_at,
            stop_count: journey.route_json.len(),
            total_duration: journey.route_json.total_duration,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JourneyListResponse {
    pub journeys: Vec<JourneySummary>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
