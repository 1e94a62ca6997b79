pub mod config;
pub mod error;
pub mod handlers;
pub mod json_ledger;
pub mod ledger;
pub mod middleware;
pub mod models;
pub mod phone;
pub mod util;
pub mod verifier;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use ledger::SubmissionLedger;
use middleware::rate_limit::RateLimiter;
use std::sync::Arc;
use verifier::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub ledger: Arc<dyn SubmissionLedger>,
    pub rate_limiter: RateLimiter,
    pub pairing_code: String,
    pub admin_password: Option<String>,
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/verify", post(handlers::verify::verify))
        .route("/submissions", get(handlers::submissions::list))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/remove", post(handlers::admin::remove))
        .layer(axum_middleware::from_fn_with_state(
            state,
            middleware::admin_auth::require_admin_password,
        ))
}

/// Build the full application router (used by main and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(health_routes())
        .merge(admin_routes(state.clone()))
        .with_state(state)
}
