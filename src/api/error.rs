use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::bpoc::RolloutError;
use crate::controller::PlatformError;
use crate::repo::RepoError;

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Review required: {0}")]
    ReviewRequired(String),

    #[error("Content rejected: {0}")]
    ContentRejected(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Error response that gets serialized to JSON
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) | ApiError::ContentRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) | ApiError::ReviewRequired(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NotFound",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::Conflict(_) => "Conflict",
            ApiError::ReviewRequired(_) => "ReviewRequired",
            ApiError::ContentRejected(_) => "ContentRejected",
            ApiError::InternalError(_) => "InternalServerError",
            ApiError::ServiceUnavailable(_) => "ServiceUnavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        let message = match &self {
            ApiError::InternalError(_) => {
                tracing::error!(error = %self, "API error occurred");
                "An internal error occurred".to_string()
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::warn!(error = %self, "Service unavailable");
                self.to_string()
            }
            _ => {
                tracing::debug!(error = %self, "Client error");
                self.to_string()
            }
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(error: RepoError) -> Self {
        match error {
            RepoError::NotFound { .. } => ApiError::NotFound(error.to_string()),
            RepoError::Conflict { .. } => ApiError::Conflict(error.to_string()),
        }
    }
}

impl From<RolloutError> for ApiError {
    fn from(error: RolloutError) -> Self {
        match error {
            RolloutError::NotFound(_) => ApiError::NotFound(error.to_string()),
            RolloutError::InvalidPercentage(_) => ApiError::BadRequest(error.to_string()),
            RolloutError::Seed(_) => ApiError::InternalError(error.to_string()),
            RolloutError::InvalidTransition { .. }
            | RolloutError::DependencyNotReady { .. }
            | RolloutError::HasDependents { .. }
            | RolloutError::RolloutFixed(_) => ApiError::Conflict(error.to_string()),
        }
    }
}

impl From<PlatformError> for ApiError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::Repo(e) => e.into(),
            PlatformError::Rollout(e) => e.into(),
            PlatformError::Currency(e) => ApiError::BadRequest(e.to_string()),
            PlatformError::Bdii(e) => ApiError::BadRequest(e.to_string()),
            PlatformError::Denied(reason) => ApiError::Forbidden(reason),
            PlatformError::ReviewRequired(reason) => ApiError::ReviewRequired(reason),
            PlatformError::ContentRejected(reason) => ApiError::ContentRejected(reason),
            PlatformError::InvalidState(reason) => ApiError::Conflict(reason),
            PlatformError::FeatureDisabled(name) => {
                ApiError::ServiceUnavailable(format!("{} is disabled", name))
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::InternalError(error.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcee::CurrencyError;
    use crate::domain::RolloutStage;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ApiError::NotFound("x".to_string()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::ValidationError("x".to_string()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::ReviewRequired("x".to_string()).status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn platform_errors_map_to_http() {
        let cases: Vec<(PlatformError, StatusCode)> = vec![
            (PlatformError::Denied("no".to_string()), StatusCode::FORBIDDEN),
            (PlatformError::ReviewRequired("later".to_string()), StatusCode::CONFLICT),
            (PlatformError::ContentRejected("spam".to_string()), StatusCode::UNPROCESSABLE_ENTITY),
            (PlatformError::FeatureDisabled("social_feed"), StatusCode::SERVICE_UNAVAILABLE),
            (CurrencyError::UnsupportedCurrency("XYZ".to_string()).into(), StatusCode::BAD_REQUEST),
            (RepoError::not_found("opportunity", "1").into(), StatusCode::NOT_FOUND),
            (RolloutError::RolloutFixed(RolloutStage::Concept).into(), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_error_display() {
        let error = ApiError::NotFound("module marketplace".to_string());
        assert_eq!(error.to_string(), "Resource not found: module marketplace");
    }
}
