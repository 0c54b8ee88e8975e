//! End-to-end flows through the HTTP router, without binding a socket.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use banibs::{api, config::Config, controller::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "integration-test-token";

fn app() -> Router {
    app_with(Config::default())
}

fn app_with(mut cfg: Config) -> Router {
    cfg.auth.token = TOKEN.to_string();
    let state = AppState::new(cfg.clone()).unwrap();
    api::router(state, &cfg)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN));
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

#[tokio::test]
async fn health_is_public_and_api_requires_token() {
    let app = app();

    let health = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let anonymous = app
        .clone()
        .oneshot(Request::get("/api/v1/bpoc/modules").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, Method::GET, "/api/v1/bpoc/modules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["total_count"], 9);
}

#[tokio::test]
async fn opportunity_moves_from_pending_to_public() {
    let app = app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/opportunities",
        Some(json!({
            "title": "Cloud apprenticeship",
            "organization": "Southside Tech Hub",
            "kind": "training",
            "description": "Six month paid apprenticeship with mentoring",
            "compensation": 3000.0,
            "currency": "USD",
            "submitted_by": "member-7"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, listed) = call(&app, Method::GET, "/api/v1/opportunities", None).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 0);

    let review_uri = format!("/api/v1/opportunities/{}/review", id);
    let (status, _) = call(
        &app,
        Method::POST,
        &review_uri,
        Some(json!({ "actor_id": "member-8", "actor_role": "member", "decision": "approve" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        Method::POST,
        &review_uri,
        Some(json!({ "actor_id": "mod-1", "actor_role": "moderator", "decision": "approve" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");

    let (status, listed) = call(&app, Method::GET, "/api/v1/opportunities?currency=EUR", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = listed["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["display_compensation"]["currency"], "EUR");
    assert_eq!(listed["metadata"]["page"], 1);
}

#[tokio::test]
async fn feed_hides_flagged_posts_and_rejects_blocked_ones() {
    let app = app();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/feed",
        Some(json!({ "author_id": "m1", "body": "Great turnout at the community cleanup" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/feed",
        Some(json!({ "author_id": "m2", "body": "you are a stupid idiot liar" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/feed",
        Some(json!({ "author_id": "m3", "body": "cheap spam here" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "ContentRejected");

    let (_, feed) = call(&app, Method::GET, "/api/v1/feed?page=1&page_size=10", None).await;
    assert_eq!(feed["metadata"]["total_count"], 1);

    let (_, analytics) = call(&app, Method::GET, "/api/v1/analytics/sentiment", None).await;
    assert_eq!(analytics["data"]["total"], 2);
    assert_eq!(analytics["data"]["flagged"], 1);
}

#[tokio::test]
async fn device_inventory_drives_recommendations() {
    let app = app();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/bdii/models",
        Some(json!({
            "id": "tab-s1",
            "name": "Community Tablet S1",
            "category": "tablet",
            "tier": "standard",
            "release_year": 2024
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for serial in ["S1-0001", "S1-0002"] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/bdii/units",
            Some(json!({ "model_id": "tab-s1", "serial": serial })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, inventory) = call(&app, Method::GET, "/api/v1/bdii/inventory", None).await;
    assert_eq!(inventory["data"][0]["total"], 2);
    assert_eq!(inventory["data"][0]["available"], 2);

    let (status, recs) = call(&app, Method::GET, "/api/v1/bdii/recommendations?horizon_days=30", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recs["data"][0]["model_id"], "tab-s1");

    let (status, _) = call(&app, Method::GET, "/api/v1/bdii/forecast?horizon_days=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn module_rollout_requires_admin() {
    let app = app();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/bpoc/modules/marketplace/advance",
        Some(json!({ "actor_id": "mod-1", "actor_role": "moderator" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/bpoc/modules/marketplace/advance",
        Some(json!({ "actor_id": "admin-1", "actor_role": "admin", "note": "scoping done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stage"], "development");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/bpoc/modules/social_feed/rollout",
        Some(json!({ "actor_id": "admin-1", "actor_role": "admin", "percentage": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rollout_percentage"], 100);

    let (_, enabled) = call(&app, Method::GET, "/api/v1/bpoc/modules/social_feed/enabled/user-42", None).await;
    assert_eq!(enabled["data"]["enabled"], true);

    let (_, decisions) = call(&app, Method::GET, "/api/v1/adcs/decisions?verdict=deny", None).await;
    assert_eq!(decisions["metadata"]["total_count"], 1);
}

#[tokio::test]
async fn currency_conversion_and_evaluation_endpoints() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/api/v1/bcee/convert?amount=100&from=USD&to=USD", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["formatted_converted"], "$100.00");

    let (status, _) = call(&app, Method::GET, "/api/v1/bcee/convert?amount=1&from=XYZ", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/adcs/evaluate",
        Some(json!({ "actor_id": "anon", "actor_role": "anonymous", "action": "feed.post" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verdict"], "deny");
    assert_eq!(body["data"]["rule_id"], "anonymous_actor");
}

#[tokio::test]
async fn disabled_opportunities_answer_service_unavailable() {
    let mut cfg = Config::default();
    cfg.features.insert("opportunities".to_string(), false);
    let app = app_with(cfg);

    for uri in ["/api/v1/opportunities", "/api/v1/opportunities/pending"] {
        let (status, body) = call(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        assert_eq!(body["error"], "ServiceUnavailable");
    }

    let (status, _) = call(&app, Method::GET, "/api/v1/feed", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, features) = call(&app, Method::GET, "/api/v1/features", None).await;
    assert_eq!(features["data"]["opportunities"], false);
}
