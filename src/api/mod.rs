//! HTTP route definitions
//!
//! The primary API is GraphQL at /graphql (WebSocket subscriptions at
//! /graphql/ws). Health endpoints sit outside GraphQL.

pub mod graphql;
pub mod health;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health endpoints (no auth required)
        .merge(health::router())
        // GraphQL endpoint (queries and mutations)
        .route("/graphql", get(graphql::graphiql).post(graphql::graphql_handler))
        // GraphQL WebSocket endpoint for subscriptions
        .route("/graphql/ws", get(graphql::graphql_ws_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
