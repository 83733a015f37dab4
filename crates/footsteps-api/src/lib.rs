pub mod analytics;
pub mod error;
pub mod middleware;
pub mod redirect;
pub mod state;
pub mod support;
pub mod validation;
pub mod waitlist;

use axum::{
    Router,
    routing::{get, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// All site routes. The server adds CORS, tracing and the static fallback.
pub fn router(state: AppState) -> Router {
    let analytics_routes = Router::new()
        .route("/api/waitlist/analytics", get(analytics::waitlist_analytics))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_analytics_token,
        ));

    Router::new()
        .route("/api/waitlist", post(waitlist::join_waitlist))
        .route("/api/waitlist/email", post(waitlist::capture_email))
        .route("/api/support", post(support::submit_support))
        .merge(analytics_routes)
        .route("/story/{*slug}", get(redirect::story))
        .route("/journey/{*slug}", get(redirect::journey))
        .route("/user/{*slug}", get(redirect::user))
        .route("/app-link-redirect", get(redirect::landing))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
