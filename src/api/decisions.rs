//! Action decision control endpoints

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    adcs::{ActionRequest, Verdict},
    api::{error::ApiError, response::success},
    controller::AppState,
};

#[derive(Debug, Deserialize)]
pub struct DecisionQuery {
    verdict: Option<Verdict>,
    limit: Option<usize>,
}

/// POST /api/v1/adcs/evaluate
pub async fn evaluate(
    State(st): State<AppState>,
    Json(req): Json<ActionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    Ok(success(st.controller.evaluate_action(req)))
}

/// GET /api/v1/adcs/decisions
pub async fn list_decisions(
    State(st): State<AppState>,
    Query(q): Query<DecisionQuery>,
) -> impl IntoResponse {
    let decisions = st.repos.decisions.recent(q.verdict, q.limit.unwrap_or(50).min(500));
    let total = decisions.len();
    success(decisions).with_count(total)
}
