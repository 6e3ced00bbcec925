//! Directions HTTP client.
//!
//! Queries the Google Directions JSON API for a single route between two
//! coordinates and reduces it to a [`RouteSummary`].

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::{Coord, TravelMode};
use crate::planner::{DirectionsProvider, RouteSummary, TransitPreference};

use super::error::DirectionsError;
use super::types::DirectionsResponse;

/// Default base URL for the directions API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to Google)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Directions API client.
///
/// Cheap to clone; clones share the connection pool and request permits.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl DirectionsClient {
    /// Create a new directions client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    fn url(&self) -> String {
        format!("{}/maps/api/directions/json", self.base_url)
    }

    /// Fetch one route between two coordinates.
    #[tracing::instrument(skip_all, fields(%origin, %destination, %mode))]
    pub async fn fetch_route(
        &self,
        origin: Coord,
        destination: Coord,
        mode: TravelMode,
        preference: Option<TransitPreference>,
    ) -> Result<RouteSummary, DirectionsError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DirectionsError::Status {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .get(self.url())
            .query(&query_params(
                origin,
                destination,
                mode,
                preference,
                &self.api_key,
            ))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DirectionsError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DirectionsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| DirectionsError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let summary = parsed.into_summary()?;
        tracing::debug!(
            meters = summary.distance_meters,
            seconds = summary.duration_seconds,
            "route found"
        );
        Ok(summary)
    }
}

impl DirectionsProvider for DirectionsClient {
    async fn route(
        &self,
        origin: Coord,
        destination: Coord,
        mode: TravelMode,
        preference: Option<TransitPreference>,
    ) -> Result<RouteSummary, DirectionsError> {
        self.fetch_route(origin, destination, mode, preference).await
    }
}

/// Query string for one request.
///
/// The routing preference only applies to transit and is omitted otherwise.
fn query_params(
    origin: Coord,
    destination: Coord,
    mode: TravelMode,
    preference: Option<TransitPreference>,
    api_key: &str,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("origin", origin.to_string()),
        ("destination", destination.to_string()),
        ("mode", mode.as_param().to_string()),
        ("alternatives", "false".to_string()),
    ];

    if let (TravelMode::Transit, Some(pref)) = (mode, preference) {
        params.push(("transit_routing_preference", pref.as_param().to_string()));
    }

    params.push(("key", api_key.to_string()));
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = DirectionsConfig::new("test-key")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = DirectionsConfig::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn client_creation_strips_trailing_slash() {
        let client =
            DirectionsClient::new(DirectionsConfig::new("k").with_base_url("http://x/")).unwrap();
        assert_eq!(client.url(), "http://x/maps/api/directions/json");
    }

    #[test]
    fn transit_params_carry_preference() {
        let params = query_params(
            Coord::new(35.69925, 139.77125),
            Coord::new(35.7019, 139.7678),
            TravelMode::Transit,
            Some(TransitPreference::FewerTransfers),
            "secret",
        );

        assert!(params.contains(&("origin", "35.69925,139.77125".to_string())));
        assert!(params.contains(&("destination", "35.7019,139.7678".to_string())));
        assert!(params.contains(&("mode", "transit".to_string())));
        assert!(params.contains(&("alternatives", "false".to_string())));
        assert!(params.contains(&(
            "transit_routing_preference",
            "fewer_transfers".to_string()
        )));
        assert!(params.contains(&("key", "secret".to_string())));
    }

    #[test]
    fn walking_params_omit_preference() {
        let params = query_params(
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 0.01),
            TravelMode::Walking,
            Some(TransitPreference::LessWalking),
            "k",
        );

        assert!(params.contains(&("mode", "walking".to_string())));
        assert!(params.iter().all(|(k, _)| *k != "transit_routing_preference"));
    }
}
