//! People provider trait and in-memory implementation.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use directory::Person;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

/// Response body of a roster fetch: `{"data": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleResponse {
    pub data: Vec<Person>,
}

impl PeopleResponse {
    pub fn new(data: Vec<Person>) -> Self {
        Self { data }
    }
}

/// External source of person records.
///
/// The roster store is the only caller.
#[async_trait]
pub trait PeopleProvider: Send + Sync {
    /// Fetches the complete roster.
    async fn get_all(&self) -> Result<PeopleResponse>;
}

#[derive(Debug, Default)]
struct InMemoryProviderState {
    people: Vec<Person>,
    fail_with: Option<ProviderError>,
    calls: usize,
}

/// In-memory people provider for tests and demos.
///
/// Clones share state, so a test can keep a handle after giving the
/// provider to a store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPeopleProvider {
    state: Arc<RwLock<InMemoryProviderState>>,
}

impl InMemoryPeopleProvider {
    /// Creates a provider serving `people`.
    pub fn new(people: Vec<Person>) -> Self {
        let provider = Self::default();
        provider.set_people(people);
        provider
    }

    /// Replaces the roster served by subsequent calls.
    pub fn set_people(&self, people: Vec<Person>) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).people = people;
    }

    /// Makes subsequent calls fail with `error`, or succeed again with `None`.
    pub fn set_fail_with(&self, error: Option<ProviderError>) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).fail_with = error;
    }

    /// Returns how many times `get_all` has been called.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).calls
    }
}

#[async_trait]
impl PeopleProvider for InMemoryPeopleProvider {
    async fn get_all(&self) -> Result<PeopleResponse> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.calls += 1;

        if let Some(err) = &state.fail_with {
            return Err(err.clone());
        }

        Ok(PeopleResponse::new(state.people.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory::AffiliationGroup;

    fn roster() -> Vec<Person> {
        vec![
            Person::new("stu-1", "1", "Harry", AffiliationGroup::Gryffindor),
            Person::new("stu-2", "2", "Draco", AffiliationGroup::Slytherin),
        ]
    }

    #[tokio::test]
    async fn serves_configured_people() {
        let provider = InMemoryPeopleProvider::new(roster());
        let response = provider.get_all().await.unwrap();
        assert_eq!(response.data, roster());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn fails_when_configured() {
        let provider = InMemoryPeopleProvider::new(roster());
        provider.set_fail_with(Some(ProviderError::Transport("connection refused".into())));

        let err = provider.get_all().await.unwrap_err();
        assert_eq!(err, ProviderError::Transport("connection refused".into()));
        assert_eq!(provider.call_count(), 1);

        provider.set_fail_with(None);
        assert!(provider.get_all().await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let provider = InMemoryPeopleProvider::default();
        let handle = provider.clone();
        handle.set_people(roster());

        assert_eq!(provider.get_all().await.unwrap().data.len(), 2);
        assert_eq!(handle.call_count(), 1);
    }

    #[test]
    fn response_deserializes_from_data_envelope() {
        let json = serde_json::json!({
            "data": [{"id": "stu-9", "roll": "9", "name": "Luna", "affiliationGroup": "Ravenclaw"}]
        });
        let response: PeopleResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].name, "Luna");
    }
}
