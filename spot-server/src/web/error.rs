//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::DomainError;
use crate::planner::RouteError;
use crate::spots::CatalogError;
use crate::store::StoreError;

use super::dto::ErrorResponse;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::Unauthorized { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message }
            | AppError::Unavailable { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::bad_request(e.to_string())
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        AppError::bad_request(e.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownSpots(_) => AppError::bad_request(e.to_string()),
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            StoreError::LimitReached { .. } => AppError::Conflict {
                message: e.to_string(),
            },
            _ => {
                tracing::error!(error = %e, "journey store failure");
                AppError::Unavailable {
                    message: "journey storage is unavailable, please try again".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(%status, message = self.message(), "request failed");
        } else {
            tracing::debug!(%status, message = self.message(), "request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JourneyId, SpotId};

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::from(RouteError::InvalidStart(SpotId::parse("9").unwrap())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(StoreError::NotFound(JourneyId::generate())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StoreError::Io {
                message: "disk full".into()
            })
            .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(StoreError::LimitReached { limit: 10 }).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(CatalogError::UnknownSpots(vec![])).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unavailable_message_hides_details() {
        let err = AppError::from(StoreError::Io {
            message: "/var/lib/secret: permission denied".into(),
        });
        assert!(err.message().contains("try again"));
        assert!(!err.message().contains("secret"));
    }

    #[test]
    fn response_carries_status() {
        let response = AppError::Conflict {
            message: "limit".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
