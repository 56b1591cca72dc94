//! The store's own browsing session: its query state and derived result.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use directory::{Permission, QueryState};
use roster::RosterStatus;
use serde::Serialize;

use super::people::{PeopleParams, PersonResponse, render};
use super::{caller_role, require};
use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct DirectoryResponse {
    pub query: QueryState,
    pub people: Vec<PersonResponse>,
    pub status: RosterStatus,
}

fn snapshot(state: &AppState, show_contact: bool) -> DirectoryResponse {
    DirectoryResponse {
        query: state.store.query_state(),
        people: render(&state.store.derived_result(), show_contact),
        status: state.store.status(),
    }
}

/// GET /directory — current derived result and the query that produced it.
#[tracing::instrument(skip(state, headers))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DirectoryResponse>, ApiError> {
    let role = caller_role(&headers)?;
    require(role, Permission::ViewDirectory)?;
    Ok(Json(snapshot(&state, role.can(Permission::ViewContactDetails))))
}

/// PUT /directory/query — update the store's query state.
///
/// Fields left out of the body keep their current value. The response
/// already reflects the new state.
#[tracing::instrument(skip(state, headers))]
pub async fn set_query(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<PeopleParams>,
) -> Result<Json<DirectoryResponse>, ApiError> {
    let role = caller_role(&headers)?;
    require(role, Permission::ViewDirectory)?;

    let query_state = params.into_query_state(state.store.query_state())?;
    state.store.set_query_state(query_state);

    Ok(Json(snapshot(&state, role.can(Permission::ViewContactDetails))))
}
