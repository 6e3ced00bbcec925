use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use spot_server::cache::{CacheConfig, SpotCache};
use spot_server::directions::{DirectionsClient, DirectionsConfig};
use spot_server::planner::RouteConfig;
use spot_server::spots::SpotCatalog;
use spot_server::store::{FileJourneyStore, Journeys, MemoryJourneyStore};
use spot_server::web::{AppState, create_router};

/// Default catalog reload interval.
const DEFAULT_REFRESH_SECS: u64 = 300;

const DEFAULT_SPOT_DATA: &str = "data/spots.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let api_key = std::env::var("GOOGLE_MAPS_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set; directions requests will fail and legs will be dropped");
        String::new()
    });

    let mut directions_config = DirectionsConfig::new(api_key);
    if let Ok(url) = std::env::var("DIRECTIONS_BASE_URL") {
        directions_config = directions_config.with_base_url(url);
    }
    let directions = DirectionsClient::new(directions_config)?;

    let spot_path = std::env::var("SPOT_DATA_PATH").unwrap_or_else(|_| DEFAULT_SPOT_DATA.to_string());
    let catalog = SpotCatalog::load(&spot_path).await?;

    let refresh_secs = env_parse("SPOT_REFRESH_SECS", DEFAULT_REFRESH_SECS);
    let cache_config = CacheConfig::default().with_ttl(Duration::from_secs(refresh_secs.max(1)));
    let cache = Arc::new(SpotCache::new(&cache_config));

    let journeys = match std::env::var("JOURNEY_STORE_PATH") {
        Ok(path) => {
            tracing::info!(%path, "using file journey store");
            Journeys::File(FileJourneyStore::new(PathBuf::from(path)))
        }
        Err(_) => {
            tracing::info!("JOURNEY_STORE_PATH not set; saved journeys are kept in memory");
            Journeys::Memory(MemoryJourneyStore::new())
        }
    };

    // Reload the catalog periodically and drop the listings it made stale
    if refresh_secs > 0 {
        let catalog_refresh = catalog.clone();
        let cache_refresh = cache.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(refresh_secs));
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match catalog_refresh.reload().await {
                    Ok(changes) => {
                        for change in &changes {
                            cache_refresh.invalidate(change).await;
                        }
                        tracing::debug!(changes = changes.len(), "reloaded spot catalog");
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to reload spot catalog"),
                }
            }
        });
    }

    let state = AppState::new(catalog, cache, directions, journeys, RouteConfig::default());
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    tracing::info!("Spot route planner listening on http://{addr}");
    tracing::info!("  GET    /health");
    tracing::info!("  GET    /api/spots?category=");
    tracing::info!("  GET    /api/spots/:id/map");
    tracing::info!("  POST   /api/routes/plan");
    tracing::info!("  GET    /api/journeys");
    tracing::info!("  POST   /api/journeys");
    tracing::info!("  GET    /api/journeys/:id");
    tracing::info!("  DELETE /api/journeys/:id");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read a numeric environment variable, falling back on absence or parse failure.
fn env_parse(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, default, "invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}
