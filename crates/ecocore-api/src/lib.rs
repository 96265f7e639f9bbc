pub mod alerts;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod middleware;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

/// The full HTTP API: public auth routes plus the token-gated dashboard and
/// alert routes. The server merges this with the WebSocket route; tests
/// drive it directly.
pub fn routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/dashboard/initial", get(dashboard::initial))
        .route("/api/dashboard/history", get(dashboard::history))
        .route("/api/alerts/critical", get(alerts::critical))
        .route("/api/alerts/{id}/acknowledge", post(alerts::acknowledge))
        .route("/api/alerts/{id}/mute", post(alerts::mute))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    public_routes.merge(protected_routes)
}
