//! Opportunity listing and moderation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    adcs::Actor,
    api::{error::ApiError, response::{success, Pagination}},
    bcee::DisplayPrice,
    controller::AppState,
    domain::{NewOpportunity, Opportunity, OpportunityKind, ReviewDecision},
    flags,
    repo::{opportunities::OpportunityFilter, RepoError},
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    kind: Option<OpportunityKind>,
    featured: Option<bool>,
    /// Show compensation converted into this currency
    currency: Option<String>,
    page: Option<usize>,
    page_size: Option<usize>,
}

impl ListQuery {
    fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    #[serde(flatten)]
    #[validate(nested)]
    actor: Actor,
    decision: ReviewDecision,
    #[validate(length(max = 1000))]
    note: Option<String>,
}

/// Listing plus compensation in the viewer's currency
#[derive(Debug, Serialize)]
pub struct OpportunityView {
    #[serde(flatten)]
    opportunity: Opportunity,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_compensation: Option<DisplayPrice>,
}

/// GET /api/v1/opportunities
pub async fn list_opportunities(
    State(st): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    st.controller.require_feature(flags::OPPORTUNITIES)?;
    let currency = &st.controller.currency;
    if let Some(code) = q.currency.as_deref() {
        currency.info(code).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    }

    let filter = OpportunityFilter { kind: q.kind, featured: q.featured };
    let listings = st.repos.opportunities.list_public(&filter);
    let total = listings.len();

    let page = q.pagination();
    let views = page
        .slice(listings)
        .into_iter()
        .map(|opportunity| {
            let display_compensation = match (q.currency.as_deref(), opportunity.compensation) {
                (Some(to), Some(amount)) => currency.display_price(amount, &opportunity.currency, to).ok(),
                _ => None,
            };
            OpportunityView { opportunity, display_compensation }
        })
        .collect::<Vec<_>>();

    Ok(success(views).with_pagination(&page, total))
}

/// POST /api/v1/opportunities
pub async fn submit_opportunity(
    State(st): State<AppState>,
    Json(req): Json<NewOpportunity>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let opp = st.controller.submit_opportunity(req)?;
    Ok((StatusCode::CREATED, success(opp)))
}

/// GET /api/v1/opportunities/pending
pub async fn pending_queue(State(st): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    st.controller.require_feature(flags::OPPORTUNITIES)?;
    let queue = st.repos.opportunities.pending();
    let total = queue.len();
    Ok(success(queue).with_count(total))
}

/// GET /api/v1/opportunities/:id
pub async fn get_opportunity(
    State(st): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    st.controller.require_feature(flags::OPPORTUNITIES)?;
    let opp = st
        .repos
        .opportunities
        .find(id)
        .ok_or_else(|| RepoError::not_found("opportunity", id))?;
    Ok(success(opp))
}

/// POST /api/v1/opportunities/:id/review
pub async fn review_opportunity(
    State(st): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let opp = st
        .controller
        .review_opportunity(id, req.decision, &req.actor, req.note)?;
    Ok(success(opp))
}
