//! Module rollout endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    adcs::Actor,
    api::{error::ApiError, response::success},
    bpoc::RolloutError,
    controller::AppState,
    domain::RolloutStage,
};

#[derive(Debug, Deserialize)]
pub struct StageQuery {
    stage: Option<RolloutStage>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransitionRequest {
    #[serde(flatten)]
    #[validate(nested)]
    actor: Actor,
    #[validate(length(max = 500))]
    note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RolloutRequest {
    #[serde(flatten)]
    #[validate(nested)]
    actor: Actor,
    percentage: u8,
}

#[derive(Debug, Serialize)]
pub struct EnabledResponse {
    module: String,
    user_id: String,
    enabled: bool,
}

/// GET /api/v1/bpoc/modules
pub async fn list_modules(
    State(st): State<AppState>,
    Query(q): Query<StageQuery>,
) -> impl IntoResponse {
    let modules = st.repos.modules.list(q.stage);
    let total = modules.len();
    success(modules).with_count(total)
}

/// GET /api/v1/bpoc/modules/:key
pub async fn get_module(
    State(st): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let module = st.repos.modules.get(&key).ok_or(RolloutError::NotFound(key))?;
    Ok(success(module))
}

/// POST /api/v1/bpoc/modules/:key/advance
pub async fn advance(
    State(st): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    Ok(success(st.controller.advance_module(&key, &req.actor, req.note)?))
}

/// POST /api/v1/bpoc/modules/:key/rollback
pub async fn rollback(
    State(st): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    Ok(success(st.controller.rollback_module(&key, &req.actor, req.note)?))
}

/// POST /api/v1/bpoc/modules/:key/deprecate
pub async fn deprecate(
    State(st): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    Ok(success(st.controller.deprecate_module(&key, &req.actor, req.note)?))
}

/// PUT /api/v1/bpoc/modules/:key/rollout
pub async fn set_rollout(
    State(st): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<RolloutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    Ok(success(st.controller.set_module_rollout(&key, req.percentage, &req.actor)?))
}

/// GET /api/v1/bpoc/modules/:key/enabled/:user_id
pub async fn enabled_for(
    State(st): State<AppState>,
    Path((key, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let enabled = st.controller.module_enabled_for(&key, &user_id)?;
    Ok(success(EnabledResponse { module: key, user_id, enabled }))
}
