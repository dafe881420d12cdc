//! Liveness and readiness probes
//!
//! Both sit outside GraphQL and need no token.

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness of the catalog and its collaborators
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
    /// Live `bookAdded` subscribers
    pub subscribers: usize,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Ready once the store answers a trivial query
async fn readyz(State(state): State<AppState>) -> Json<ReadyResponse> {
    let database = match sqlx::query("SELECT 1").execute(state.db.pool()).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check: database unavailable");
            false
        }
    };

    Json(ReadyResponse {
        ready: database,
        database,
        subscribers: state.catalog.events().subscriber_count(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
