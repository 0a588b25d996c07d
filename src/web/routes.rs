//! Route definitions

use super::state::AppState;
use super::{auth, handlers, limiter};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Rate limiting runs before authentication
    let api = Router::new()
        .route("/v1/translate", get(handlers::translate_and_search))
        .route("/api/v1/translate", get(handlers::translate_and_search))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limiter::rate_limit,
        ));

    Router::new()
        .merge(api)
        // Operational routes
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}
