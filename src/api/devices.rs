//! Device inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{error::ApiError, response::success},
    controller::AppState,
    domain::{DeviceModel, DeviceTier, DeviceUnit, UnitStatus},
};

/// Request to register a device model
#[derive(Debug, Deserialize, Validate)]
pub struct CreateModelRequest {
    #[validate(length(min = 1, max = 64))]
    id: String,
    #[validate(length(min = 1, max = 200))]
    name: String,
    #[validate(length(min = 1, max = 64))]
    category: String,
    tier: DeviceTier,
    #[validate(range(min = 1990, max = 2100))]
    release_year: i32,
    successor_id: Option<String>,
    #[serde(default = "yes")]
    supported: bool,
}

fn yes() -> bool {
    true
}

/// Request to add a unit to inventory
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUnitRequest {
    #[validate(length(min = 1, max = 64))]
    model_id: String,
    #[validate(length(min = 1, max = 128))]
    serial: String,
    status: Option<UnitStatus>,
    acquired_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    status: UnitStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 128))]
    user_id: String,
    unit_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct HorizonQuery {
    horizon_days: Option<u32>,
}

const DEFAULT_HORIZON_DAYS: u32 = 90;

/// GET /api/v1/bdii/models
pub async fn list_models(State(st): State<AppState>) -> impl IntoResponse {
    let models = st.repos.devices.list_models();
    let total = models.len();
    success(models).with_count(total)
}

/// POST /api/v1/bdii/models
pub async fn create_model(
    State(st): State<AppState>,
    Json(req): Json<CreateModelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let model = DeviceModel {
        id: req.id,
        name: req.name,
        category: req.category,
        tier: req.tier,
        release_year: req.release_year,
        successor_id: req.successor_id,
        supported: req.supported,
    };
    st.repos.devices.insert_model(model.clone())?;
    Ok((StatusCode::CREATED, success(model)))
}

/// GET /api/v1/bdii/units
pub async fn list_units(State(st): State<AppState>) -> impl IntoResponse {
    let units = st.repos.devices.list_units();
    let total = units.len();
    success(units).with_count(total)
}

/// POST /api/v1/bdii/units
pub async fn create_unit(
    State(st): State<AppState>,
    Json(req): Json<CreateUnitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let unit = DeviceUnit {
        id: Uuid::new_v4(),
        model_id: req.model_id,
        serial: req.serial,
        status: req.status.unwrap_or(UnitStatus::Available),
        acquired_at: req.acquired_at.unwrap_or_else(Utc::now),
    };
    st.repos.devices.insert_unit(unit.clone())?;
    Ok((StatusCode::CREATED, success(unit)))
}

/// PUT /api/v1/bdii/units/:id/status
pub async fn update_unit_status(
    State(st): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = st.repos.devices.update_unit_status(id, req.status)?;
    Ok(success(unit))
}

/// GET /api/v1/bdii/links
pub async fn list_links(State(st): State<AppState>) -> impl IntoResponse {
    let links = st.repos.devices.list_links();
    let total = links.len();
    success(links).with_count(total)
}

/// POST /api/v1/bdii/links
pub async fn create_link(
    State(st): State<AppState>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let link = st.repos.devices.link(&req.user_id, req.unit_id, Utc::now())?;
    Ok((StatusCode::CREATED, success(link)))
}

/// DELETE /api/v1/bdii/links/:id
pub async fn delete_link(
    State(st): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let link = st.repos.devices.unlink(id)?;
    Ok(success(link))
}

/// GET /api/v1/bdii/inventory
pub async fn inventory(State(st): State<AppState>) -> impl IntoResponse {
    let snapshots = st.controller.inventory();
    let total = snapshots.len();
    success(snapshots).with_count(total)
}

/// GET /api/v1/bdii/upgrades
pub async fn upgrades(State(st): State<AppState>) -> impl IntoResponse {
    let results = st.controller.upgrades(Utc::now());
    let total = results.len();
    success(results).with_count(total)
}

/// GET /api/v1/bdii/forecast
pub async fn forecast(
    State(st): State<AppState>,
    Query(q): Query<HorizonQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let forecasts = st.controller.forecast(q.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS))?;
    Ok(success(forecasts))
}

/// GET /api/v1/bdii/recommendations
pub async fn recommendations(
    State(st): State<AppState>,
    Query(q): Query<HorizonQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let recs = st
        .controller
        .recommendations(q.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS))?;
    Ok(success(recs))
}
