//! Axum router configuration with middleware.
//!
//! Routes are served at the root and again under `/api` for older clients.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/conversations",
            get(handlers::conversation::list_conversations)
                .post(handlers::conversation::create_conversation),
        )
        .route(
            "/conversations/user/{user_identifier}",
            get(handlers::conversation::user_history),
        )
        .route("/conversations/stats", get(handlers::stats::global_stats))
        .route(
            "/conversations/stats/{user_identifier}",
            get(handlers::stats::user_stats),
        );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes.clone())
        .nest("/api", api_routes)
        .fallback(handlers::health::route_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
