//! Health check endpoints
//!
//! `/health` answers without touching the database. `/health/ready` runs
//! the liveness query through the connection manager.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use lodestone_db::{ConnectionFactory, DbError, TransactionScope};
use serde::Serialize;

use crate::http::ApiError;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /health/ready
async fn ready<F: ConnectionFactory>(
    State(state): State<AppState<F>>,
) -> Result<Json<ReadyResponse>, ApiError> {
    let check: Result<(), DbError> = state
        .db()
        .with_connection(|conn| Box::pin(async move { conn.ping().await }))
        .await;

    match check {
        Ok(()) => Ok(Json(ReadyResponse {
            status: "ok",
            database: "connected",
        })),
        // A failed liveness query means the database is unreachable
        Err(err) => Err(err.into_connectivity().into()),
    }
}

/// Health routes
pub fn router<F: ConnectionFactory>() -> Router<AppState<F>> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready::<F>))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn ready_maps_failures_to_unavailable() {
        use lodestone_db::testing::{Recorder, RecordingFactory};
        use lodestone_db::ConnectionManager;
        use std::sync::Arc;

        let recorder = Recorder::new();
        let manager = Arc::new(ConnectionManager::<RecordingFactory>::new());
        let state = AppState::new(Arc::clone(&manager));

        let err = ready(State(state.clone())).await.unwrap_err();
        assert!(matches!(err, ApiError::Unavailable { .. }));

        manager.start(&recorder).unwrap();
        recorder.fail_pings(true);
        let err = ready(State(state.clone())).await.unwrap_err();
        assert!(matches!(err, ApiError::Unavailable { .. }));

        recorder.fail_pings(false);
        let Json(body) = ready(State(state)).await.unwrap();
        assert_eq!(body.database, "connected");
    }

    #[test]
    fn health_body_shape() {
        let body = serde_json::to_value(HealthResponse { status: "ok" }).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "ok" }));
    }
}
