//! Currency display endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    api::{error::ApiError, response::success},
    controller::{AppState, PlatformError},
};

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    amount: f64,
    from: String,
    to: Option<String>,
}

/// GET /api/v1/bcee/currencies
pub async fn list_currencies(State(st): State<AppState>) -> impl IntoResponse {
    let currencies = st.controller.currency.supported();
    success(currencies).with_count(currencies.len())
}

/// GET /api/v1/bcee/convert?amount=&from=&to=
pub async fn convert(
    State(st): State<AppState>,
    Query(q): Query<ConvertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let currency = &st.controller.currency;
    let to = q.to.as_deref().unwrap_or(currency.default_currency().code);
    let price = currency
        .display_price(q.amount, &q.from, to)
        .map_err(PlatformError::from)?;
    Ok(success(price))
}

/// GET /api/v1/bcee/region/:code
pub async fn region_currency(
    State(st): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    success(st.controller.currency.currency_for_region(&code))
}
