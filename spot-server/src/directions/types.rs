//! Directions API response types.
//!
//! Only the fields a leg needs are modelled; everything else in the
//! response is ignored.

use serde::Deserialize;

use crate::planner::RouteSummary;

use super::error::DirectionsError;

/// Top-level response of `/maps/api/directions/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<RouteDto>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    #[serde(default)]
    pub legs: Vec<LegDto>,
    #[serde(default)]
    pub overview_polyline: Option<PolylineDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegDto {
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolylineDto {
    pub points: String,
}

/// A `{ "text": ..., "value": ... }` pair; `value` is meters or seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub text: String,
    pub value: u64,
}

impl DirectionsResponse {
    /// Interpret the response status and reduce the first route to a summary.
    ///
    /// A missing distance or duration counts as zero.
    pub fn into_summary(self) -> Result<RouteSummary, DirectionsError> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(DirectionsError::NoRoute),
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => return Err(DirectionsError::RateLimited),
            "REQUEST_DENIED" => return Err(DirectionsError::Unauthorized),
            other => {
                return Err(DirectionsError::Api {
                    status: other.to_string(),
                    message: self.error_message.unwrap_or_default(),
                });
            }
        }

        let route = self.routes.into_iter().next().ok_or(DirectionsError::NoRoute)?;
        let leg = route.legs.first().ok_or(DirectionsError::NoRoute)?;

        Ok(RouteSummary {
            distance_meters: leg.distance.as_ref().map_or(0, |d| d.value),
            duration_seconds: leg.duration.as_ref().map_or(0, |d| d.value),
            encoded_path: route.overview_polyline.map(|p| p.points),
        })
    }
}
