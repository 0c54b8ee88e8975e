//! Community feed and sentiment analytics endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::{error::ApiError, response::{success, Pagination}},
    controller::AppState,
    flags,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 128))]
    author_id: String,
    #[validate(length(min = 1, max = 5000))]
    body: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    since: Option<DateTime<Utc>>,
}

/// GET /api/v1/feed
pub async fn list_posts(
    State(st): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    st.controller.require_feature(flags::SOCIAL_FEED)?;
    let (posts, total) = st.repos.feed.visible(page.limit(), page.offset());
    Ok(success(posts).with_pagination(&page, total))
}

/// POST /api/v1/feed
pub async fn create_post(
    State(st): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let post = st.controller.create_post(&req.author_id, &req.body)?;
    let status = if post.hidden { StatusCode::ACCEPTED } else { StatusCode::CREATED };
    Ok((status, success(post)))
}

/// GET /api/v1/analytics/sentiment
pub async fn sentiment_analytics(
    State(st): State<AppState>,
    Query(q): Query<AnalyticsQuery>,
) -> impl IntoResponse {
    success(st.controller.sentiment_summary(q.since))
}
