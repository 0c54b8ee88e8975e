use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::controller::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    module_catalogue: ComponentHealth,
    decision_log: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ComponentHealth {
    fn healthy(detail: impl Into<String>) -> Self {
        Self { status: "healthy".to_string(), detail: Some(detail.into()) }
    }

    fn unhealthy(error: impl Into<String>) -> Self {
        Self { status: "unhealthy".to_string(), detail: Some(error.into()) }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

fn check_module_catalogue(state: &AppState) -> ComponentHealth {
    match state.repos.modules.list(None).len() {
        0 => ComponentHealth::unhealthy("module catalogue is empty"),
        n => ComponentHealth::healthy(format!("{} modules", n)),
    }
}

fn check_decision_log(state: &AppState) -> ComponentHealth {
    ComponentHealth::healthy(format!("{} decisions retained", state.repos.decisions.len()))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let checks = HealthChecks {
        module_catalogue: check_module_catalogue(&state),
        decision_log: check_decision_log(&state),
    };
    let all_healthy = checks.module_catalogue.is_healthy() && checks.decision_log.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now(),
        checks,
    };
    let status_code = if all_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    tracing::debug!(healthy = all_healthy, "health check completed");

    (status_code, Json(response))
}

/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if check_module_catalogue(&state).is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_health() {
        assert!(ComponentHealth::healthy("ok").is_healthy());
        let down = ComponentHealth::unhealthy("empty");
        assert!(!down.is_healthy());
        assert_eq!(down.detail.as_deref(), Some("empty"));
    }

    #[test]
    fn seeded_state_is_ready() {
        let state = AppState::new(crate::config::Config::default()).unwrap();
        assert!(check_module_catalogue(&state).is_healthy());
    }
}
