//! HTTP route handlers.

use std::collections::HashSet;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;

use crate::domain::{Category, Journey, JourneyId, SpotId, UserId, maps_url};
use crate::planner::{DirectionsProvider, RouteConfig, RoutePlanner, revalidate};
use crate::spots::SpotRepository;
use crate::store::JourneyStore;

use super::dto::*;
use super::error::AppError;
use super::state::AppState;

/// Header carrying the caller's user id.
pub const USER_HEADER: &str = "x-user-id";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/spots", get(list_spots))
        .route("/api/spots/:id/map", get(spot_map_link))
        .route("/api/routes/plan", post(plan_route))
        .route("/api/journeys", get(list_journeys).post(save_journey))
        .route("/api/journeys/:id", get(get_journey).delete(delete_journey))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List published spots, optionally by category.
async fn list_spots(
    State(state): State<AppState>,
    Query(query): Query<SpotListQuery>,
) -> Result<Json<SpotListResponse>, AppError> {
    let filter = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(Category::parse)
        .transpose()?;

    let spots = state
        .cache
        .get_or_load(filter, || state.catalog.list_spots(filter))
        .await?;

    Ok(Json(SpotListResponse {
        spots: spots.as_ref().clone(),
    }))
}

/// Map search link for a published spot.
async fn spot_map_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MapLinkResponse>, AppError> {
    let spot_id = SpotId::parse(&id)?;
    let spot = state
        .catalog
        .get(&spot_id)
        .await
        .filter(|s| s.is_published())
        .ok_or_else(|| AppError::NotFound {
            message: format!("Spot {spot_id} not found"),
        })?;

    let url = maps_url(spot.location.as_deref(), &spot.name_en, &spot.name_jp);
    Ok(Json(MapLinkResponse { spot_id, url }))
}

/// Plan a route through the selected spots.
async fn plan_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanRouteResponse>, AppError> {
    let req: PlanRouteRequest = parse_json(&body)?;
    let provider = state.directions.clone();
    plan_with(&state, provider.as_ref(), req).await.map(Json)
}

async fn plan_with<P: DirectionsProvider>(
    state: &AppState,
    provider: &P,
    req: PlanRouteRequest,
) -> Result<PlanRouteResponse, AppError> {
    let ids = parse_selection(&req.spot_ids, &state.config)?;
    let start = SpotId::parse(&req.start_spot_id)?;

    let spots = state.catalog.get_spots(&ids).await?;
    let planned = RoutePlanner::new(provider, &state.config)
        .plan(&spots, &start)
        .await?;

    Ok(planned.into())
}

/// Validate the size of a selection and parse its ids.
fn parse_selection(raw: &[String], config: &RouteConfig) -> Result<Vec<SpotId>, AppError> {
    if raw.len() < config.min_stops || raw.len() > config.max_stops {
        return Err(AppError::bad_request(format!(
            "Select between {} and {} spots (got {})",
            config.min_stops,
            config.max_stops,
            raw.len()
        )));
    }

    let mut seen = HashSet::with_capacity(raw.len());
    let mut ids = Vec::with_capacity(raw.len());
    for s in raw {
        let id = SpotId::parse(s)?;
        if !seen.insert(id.clone()) {
            return Err(AppError::bad_request(format!("Duplicate spot id: {id}")));
        }
        ids.push(id);
    }

    Ok(ids)
}

/// Save a planned route for the calling user.
async fn save_journey(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Journey>), AppError> {
    let user = current_user(&headers)?;
    let req: SaveJourneyRequest = parse_json(&body)?;

    if req.route.is_empty() {
        return Err(AppError::bad_request("Route has no stops"));
    }

    let journey = Journey::new(user, &req.title, req.route)?;

    state
        .journeys
        .insert_capped(journey.clone(), state.config.max_saved_journeys)
        .await?;
    tracing::info!(journey_id = %journey.journey_id, user = %journey.user_id, "journey saved");

    Ok((StatusCode::CREATED, Json(journey)))
}

/// The calling user's journeys, newest first.
async fn list_journeys(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<JourneyListResponse>, AppError> {
    let user = current_user(&headers)?;
    let journeys = state.journeys.list_for_user(&user).await?;

    Ok(Json(JourneyListResponse {
        journeys: journeys.iter().map(JourneySummary::from).collect(),
    }))
}

/// A saved journey with its stops checked against the current catalog.
async fn get_journey(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Journey>, AppError> {
    let user = current_user(&headers)?;
    let journey_id = JourneyId::parse(&id)?;

    let mut journey = state
        .journeys
        .get(journey_id)
        .await?
        .filter(|j| j.is_owned_by(&user))
        .ok_or_else(|| AppError::NotFound {
            message: format!("Journey {journey_id} not found"),
        })?;

    let statuses = state
        .catalog
        .fetch_statuses(&journey.route_json.stop_ids())
        .await?;
    journey.route_json = revalidate(journey.route_json, &statuses);

    if journey.route_json.has_deleted_stops() {
        tracing::debug!(%journey_id, "journey has unavailable stops");
    }

    Ok(Json(journey))
}

async fn delete_journey(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user = current_user(&headers)?;
    let journey_id = JourneyId::parse(&id)?;

    state.journeys.delete(&user, journey_id).await?;
    tracing::info!(%journey_id, %user, "journey deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Identify the caller from the user header.
fn current_user(headers: &HeaderMap) -> Result<UserId, AppError> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| UserId::parse(v).ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: format!("Missing {USER_HEADER} header"),
        })
}

/// Parse a JSON body manually so the body can be logged on failure.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::bad_request(format!("Invalid JSON: {e}"))
    })
}
