//! Directory error types.

use thiserror::Error;

/// Errors raised while interpreting directory input.
///
/// The query engine itself never fails; these come from parsing
/// user-supplied text at the edges (sort keys, roles, emails, preferences).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The requested sort key is not one of the supported keys.
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    /// The role name is not recognised.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The email address is not of the form `local@domain`.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// The email address belongs to a domain that may not sign up.
    #[error("Email {email} is not in the allowed domain {domain}")]
    EmailDomainNotAllowed { email: String, domain: String },

    /// A preference value could not be parsed.
    #[error("Invalid value for preference {name}: {value}")]
    InvalidPreference { name: &'static str, value: String },
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
