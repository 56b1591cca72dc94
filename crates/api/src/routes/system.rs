//! Health and metrics endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use roster::LoadState;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub roster: LoadState,
}

/// GET /health — `ok` while the last roster load succeeded, `degraded` otherwise.
///
/// Always 200: the directory keeps serving its last good roster.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let roster = state.store.status().state;
    let status = match roster {
        LoadState::Ready => "ok",
        LoadState::Uninitialized | LoadState::Loading | LoadState::Error => "degraded",
    };
    Json(HealthResponse { status, roster })
}

/// GET /metrics — returns Prometheus-formatted metrics.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
