//! Directions client error types.

/// Errors from the directions HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status not covered by a more specific variant
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// The API answered with a `status` field it does not treat as success
    #[error("API status {status}: {message}")]
    Api { status: String, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The provider answered but found no usable route
    #[error("no route found")]
    NoRoute,

    /// Rate limited by the API
    #[error("rate limited by directions API")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(DirectionsError::NoRoute.to_string(), "no route found");

        let err = DirectionsError::Api {
            status: "INVALID_REQUEST".into(),
            message: "origin missing".into(),
        };
        assert_eq!(err.to_string(), "API status INVALID_REQUEST: origin missing");

        let err = DirectionsError::Status {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "HTTP status 502: bad gateway");
    }
}
