//! Stateless roster queries.
//!
//! These run the query engine over the store's current roster without
//! touching the store's own query state, so concurrent callers cannot
//! interfere with each other.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use directory::{
    AffiliationGroup, DirectorySummary, Permission, Person, PersonId, QueryState, SortKey, Status,
    query, summarize,
};
use serde::{Deserialize, Serialize};

use super::{caller_role, require};
use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Default, Deserialize)]
pub struct PeopleParams {
    /// Free-text filter.
    pub q: Option<String>,
    /// Sort key; unknown keys are rejected.
    pub sort: Option<String>,
}

impl PeopleParams {
    pub(crate) fn into_query_state(self, base: QueryState) -> Result<QueryState, ApiError> {
        let mut state = base;
        if let Some(q) = self.q {
            state.free_text_query = q;
        }
        if let Some(sort) = self.sort {
            state.sort_key = sort.parse::<SortKey>()?;
        }
        Ok(state)
    }
}

// -- Response types --

/// A person as shown to a caller.
///
/// Contact fields are omitted unless the caller may view contact details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: String,
    pub roll: String,
    pub name: String,
    pub hometown: String,
    pub blood_group: String,
    pub avatar_ref: String,
    pub affiliation_group: AffiliationGroup,
    pub affiliation_roll: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_handle: Option<String>,
}

impl PersonResponse {
    pub fn from_person(person: &Person, show_contact: bool) -> Self {
        Self {
            id: person.id.to_string(),
            roll: person.roll.clone(),
            name: person.name.clone(),
            hometown: person.hometown.clone(),
            blood_group: person.blood_group.clone(),
            avatar_ref: person.avatar_ref.clone(),
            affiliation_group: person.affiliation_group,
            affiliation_roll: person.affiliation_roll.clone(),
            status: person.status,
            phone: show_contact.then(|| person.phone.clone()),
            contact_handle: show_contact.then(|| person.contact_handle.clone()),
        }
    }
}

pub(crate) fn render(people: &[Person], show_contact: bool) -> Vec<PersonResponse> {
    people
        .iter()
        .map(|p| PersonResponse::from_person(p, show_contact))
        .collect()
}

// -- Handlers --

/// GET /people?q=&sort= — filter and sort the current roster.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<PeopleParams>,
) -> Result<Json<Vec<PersonResponse>>, ApiError> {
    let role = caller_role(&headers)?;
    require(role, Permission::ViewDirectory)?;

    let query_state = params.into_query_state(QueryState::default())?;
    let roster = state.store.roster();
    let people = query(&roster, &query_state);

    Ok(Json(render(&people, role.can(Permission::ViewContactDetails))))
}

/// GET /people/{id} — a single person by id.
#[tracing::instrument(skip(state, headers))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<PersonResponse>, ApiError> {
    let role = caller_role(&headers)?;
    require(role, Permission::ViewDirectory)?;

    let id = PersonId::new(id);
    let roster = state.store.roster();
    let person = roster
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("Person {id} not found")))?;

    Ok(Json(PersonResponse::from_person(
        person,
        role.can(Permission::ViewContactDetails),
    )))
}

/// GET /summary — headcounts over the current roster.
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<DirectorySummary> {
    Json(summarize(&state.store.roster()))
}
