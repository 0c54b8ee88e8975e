use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use crate::{
    api::{currency, decisions, devices, feed, modules, opportunities, response::success},
    auth::{self, AuthConfig},
    config::Config,
    controller::AppState,
};

pub fn router(state: AppState, cfg: &Config) -> Router {
    Router::new()
        .route("/features", get(list_features))
        // device inventory
        .route("/bdii/models", get(devices::list_models).post(devices::create_model))
        .route("/bdii/units", get(devices::list_units).post(devices::create_unit))
        .route("/bdii/units/:id/status", put(devices::update_unit_status))
        .route("/bdii/links", get(devices::list_links).post(devices::create_link))
        .route("/bdii/links/:id", axum::routing::delete(devices::delete_link))
        .route("/bdii/inventory", get(devices::inventory))
        .route("/bdii/upgrades", get(devices::upgrades))
        .route("/bdii/forecast", get(devices::forecast))
        .route("/bdii/recommendations", get(devices::recommendations))
        // decision control
        .route("/adcs/evaluate", post(decisions::evaluate))
        .route("/adcs/decisions", get(decisions::list_decisions))
        // currency display
        .route("/bcee/currencies", get(currency::list_currencies))
        .route("/bcee/convert", get(currency::convert))
        .route("/bcee/region/:code", get(currency::region_currency))
        // module rollout
        .route("/bpoc/modules", get(modules::list_modules))
        .route("/bpoc/modules/:key", get(modules::get_module))
        .route("/bpoc/modules/:key/advance", post(modules::advance))
        .route("/bpoc/modules/:key/rollback", post(modules::rollback))
        .route("/bpoc/modules/:key/deprecate", post(modules::deprecate))
        .route("/bpoc/modules/:key/rollout", put(modules::set_rollout))
        .route("/bpoc/modules/:key/enabled/:user_id", get(modules::enabled_for))
        // opportunities
        .route(
            "/opportunities",
            get(opportunities::list_opportunities).post(opportunities::submit_opportunity),
        )
        .route("/opportunities/pending", get(opportunities::pending_queue))
        .route("/opportunities/:id", get(opportunities::get_opportunity))
        .route("/opportunities/:id/review", post(opportunities::review_opportunity))
        // feed
        .route("/feed", get(feed::list_posts).post(feed::create_post))
        .route("/analytics/sentiment", get(feed::sentiment_analytics))
        .route_layer(middleware::from_fn_with_state(
            AuthConfig::new(&cfg.auth.token),
            auth::require_bearer,
        ))
        .with_state(state)
}

/// GET /api/v1/features
pub async fn list_features(State(st): State<AppState>) -> impl IntoResponse {
    success(st.controller.flags.all().clone())
}
