//! Roster error types.

use common::PersonId;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by a [`PeopleProvider`](crate::PeopleProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not be reached or refused the request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with data that is not a roster.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// A failed roster fetch, as recorded on the store.
///
/// Stored and handed to consumers as data; it never escapes the store as an
/// `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FetchFailure {
    /// The provider call failed.
    #[error("Could not reach the people provider: {0}")]
    Transport(String),

    /// The provider returned something other than a roster.
    #[error("People provider returned malformed data: {0}")]
    Malformed(String),

    /// Two records in the response share an id.
    #[error("Roster contains duplicate person id {0}")]
    DuplicateId(PersonId),
}

impl From<ProviderError> for FetchFailure {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Transport(msg) => FetchFailure::Transport(msg),
            ProviderError::Malformed(msg) => FetchFailure::Malformed(msg),
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_failures() {
        assert_eq!(
            FetchFailure::from(ProviderError::Transport("timeout".into())),
            FetchFailure::Transport("timeout".into())
        );
        assert_eq!(
            FetchFailure::from(ProviderError::Malformed("bad".into())),
            FetchFailure::Malformed("bad".into())
        );
    }

    #[test]
    fn json_errors_are_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(ProviderError::from(err), ProviderError::Malformed(_)));
    }

    #[test]
    fn failure_serializes_with_kind_and_message() {
        let json = serde_json::to_value(FetchFailure::DuplicateId(PersonId::new("stu-1"))).unwrap();
        assert_eq!(json["kind"], "duplicate_id");
        assert_eq!(json["message"], "stu-1");
    }
}
