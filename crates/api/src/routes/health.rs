//! `GET /health`, mounted at the root beside `/api`.
//!
//! Reports the two things the catalog cannot serve without: the database and
//! a writable media root. Either failing answers 503 so a load balancer can
//! take the instance out of rotation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    /// `ok`, or `degraded` when any check fails.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub media_writable: bool,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    let (db, media_writable) = tokio::join!(
        baja_db::health_check(&state.pool),
        state.storage.is_writable()
    );
    let db_healthy = db.is_ok();

    let (code, status) = if db_healthy && media_writable {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!(db_healthy, media_writable, "Health check degraded");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(Health {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            media_writable,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
