//! Live score server.
//!
//! An Axum server exposing the live score service over HTTP:
//!
//! - [`api::matches`]: CRUD endpoints for match records, with the
//!   mutating routes gated behind a shared admin token
//! - [`events`]: a server-sent-events stream that pushes the complete
//!   match list to every viewer after each change
//! - [`config`]: TOML configuration with environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod middleware;

use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use livescore_core::{AdminGate, ScoreBoard};
use tower_http::cors::{Any, CorsLayer};

/// Application state shared between all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Match state and the broadcast hub behind the event stream.
    pub board: Arc<ScoreBoard>,
    /// Token check guarding the mutating routes.
    pub gate: Arc<AdminGate>,
}

/// Health check endpoint.
///
/// Returns a simple "ok" response to indicate the server is running.
async fn health() -> &'static str {
    "ok"
}

/// Builds the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    // CORS layer so the scoreboard page can be served from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(
            "/matches",
            get(api::matches::list_matches).post(api::matches::create_match),
        )
        .route(
            "/matches/:id",
            put(api::matches::update_match).delete(api::matches::delete_match),
        )
        .route("/events", get(events::events))
        .with_state(state)
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::logging::request_log))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_returns_ok() {
        assert_eq!(health().await, "ok");
    }
}
