//! Route planning configuration.

use crate::domain::DEFAULT_STAY_MINUTES;

/// Configuration parameters for route planning and the policies the
/// HTTP layer applies around it.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Stay time assumed for spots without `avg_stay_minutes`.
    pub default_stay_mins: u32,

    /// Minimum number of spots a route request must select.
    pub min_stops: usize,

    /// Maximum number of spots a route request may select.
    /// Enforced by the caller; the sequencer itself accepts any size.
    pub max_stops: usize,

    /// Maximum number of saved journeys per user.
    pub max_saved_journeys: usize,
}

impl RouteConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        default_stay_mins: u32,
        min_stops: usize,
        max_stops: usize,
        max_saved_journeys: usize,
    ) -> Self {
        Self {
            default_stay_mins,
            min_stops,
            max_stops,
            max_saved_journeys,
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            default_stay_mins: DEFAULT_STAY_MINUTES,
            min_stops: 2,
            max_stops: 10,
            max_saved_journeys: 10,
        }
    }
}
