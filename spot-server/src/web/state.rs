//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::SpotCache;
use crate::directions::DirectionsClient;
use crate::planner::RouteConfig;
use crate::spots::SpotCatalog;
use crate::store::Journeys;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Spot catalog, shared with the background reload task
    pub catalog: SpotCatalog,

    /// Cached spot listings
    pub cache: Arc<SpotCache>,

    /// Directions API client
    pub directions: Arc<DirectionsClient>,

    /// Saved journeys
    pub journeys: Arc<Journeys>,

    /// Route planning configuration
    pub config: Arc<RouteConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        catalog: SpotCatalog,
        cache: Arc<SpotCache>,
        directions: DirectionsClient,
        journeys: Journeys,
        config: RouteConfig,
    ) -> Self {
        Self {
            catalog,
            cache,
            directions: Arc::new(directions),
            journeys: Arc::new(journeys),
            config: Arc::new(config),
        }
    }
}
