//! Roster load status and manual reload.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use directory::Permission;
use roster::{FetchFailure, LoadOutcome, RosterStatus};
use serde::Serialize;

use super::{caller_role, require};
use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchFailure>,
    pub status: RosterStatus,
}

/// GET /roster/status — load state, last error, and roster size.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<RosterStatus> {
    Json(state.store.status())
}

/// POST /roster/reload — fetch the roster again, superseding any fetch in flight.
///
/// Requires [`Permission::ManageRoster`]. A failed fetch answers 502 with the
/// failure in the body; the previous roster keeps being served.
#[tracing::instrument(skip(state, headers))]
pub async fn reload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ReloadResponse>), ApiError> {
    let role = caller_role(&headers)?;
    require(role, Permission::ManageRoster)?;

    let outcome = state.store.reload().await;
    let (code, outcome, people, error) = match outcome {
        LoadOutcome::Loaded { people } => (StatusCode::OK, "loaded", Some(people), None),
        LoadOutcome::Failed(failure) => (StatusCode::BAD_GATEWAY, "failed", None, Some(failure)),
        LoadOutcome::Superseded => (StatusCode::CONFLICT, "superseded", None, None),
    };

    Ok((
        code,
        Json(ReloadResponse {
            outcome,
            people,
            error,
            status: state.store.status(),
        }),
    ))
}
