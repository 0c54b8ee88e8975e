use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::error::ApiError;

/// Static bearer token shared by API clients
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Arc<str>,
}

impl AuthConfig {
    pub fn new(token: &str) -> Self {
        Self { token: Arc::from(token) }
    }

    fn accepts(&self, header: Option<&str>) -> bool {
        let Some(presented) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
            return false;
        };
        constant_time_eq(presented.trim().as_bytes(), self.token.as_bytes())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware rejecting requests without the configured bearer token.
pub async fn require_bearer(State(auth): State<AuthConfig>, req: Request, next: Next) -> Response {
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth.token.is_empty() || !auth.accepts(header) {
        tracing::debug!(path = %req.uri().path(), "rejected request without valid token");
        return ApiError::Unauthorized.into_response();
    }
    next.run(req).await
}
