//! Health and build endpoints for load balancers and deploy tooling. Mounted outside the login gate.

use crate::state::AdminState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
}

/// Readiness: the database answers and how many models are being served.
#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    database: &'static str,
    models: usize,
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    title: String,
}

async fn health() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

async fn ready(State(state): State<AdminState>) -> impl IntoResponse {
    let models = state.registry.len();
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Readiness {
                status: "ok",
                database: "ok",
                models,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "degraded",
                    database: "unavailable",
                    models,
                }),
            )
        }
    }
}

async fn version(State(state): State<AdminState>) -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        title: state.settings.title.clone(),
    })
}

/// GET /health, /ready, /version.
pub fn common_routes(state: AdminState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
