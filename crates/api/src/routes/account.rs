//! Sign-up eligibility and display preferences.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use directory::Preferences;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SignupCheckRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct SignupCheckResponse {
    pub email: String,
    pub allowed: bool,
}

/// POST /signup/check — whether an address may register.
///
/// 400 for a malformed address, 403 for one outside the allowed domain.
#[tracing::instrument(skip(state, req))]
pub async fn check_signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupCheckRequest>,
) -> Result<Json<SignupCheckResponse>, ApiError> {
    let email = state.email_policy.check(&req.email)?;
    Ok(Json(SignupCheckResponse {
        email,
        allowed: true,
    }))
}

/// GET /preferences — defaults resolved at start-up.
pub async fn preferences(State(state): State<Arc<AppState>>) -> Json<Preferences> {
    Json(state.preferences)
}
