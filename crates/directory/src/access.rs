//! Roles, permissions, and the sign-up email gate.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, Result};

/// Something a user may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDirectory,
    ViewContactDetails,
    EditOwnProfile,
    ManageRoster,
    ManageRoles,
}

/// A user's role.
///
/// Roles are looked up, never stored here; the session layer supplies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Moderator,
    Member,
    #[default]
    Guest,
}

impl Role {
    /// Returns the permissions granted to this role.
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::Admin => &[
                ViewDirectory,
                ViewContactDetails,
                EditOwnProfile,
                ManageRoster,
                ManageRoles,
            ],
            Role::Moderator => &[
                ViewDirectory,
                ViewContactDetails,
                EditOwnProfile,
                ManageRoster,
            ],
            Role::Member => &[ViewDirectory, ViewContactDetails, EditOwnProfile],
            Role::Guest => &[ViewDirectory],
        }
    }

    /// Returns true if this role grants `permission`.
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::Member => "member",
            Role::Guest => "guest",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "member" => Ok(Role::Member),
            "guest" => Ok(Role::Guest),
            _ => Err(DirectoryError::UnknownRole(s.to_string())),
        }
    }
}

/// Restricts sign-up to addresses in a single email domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDomainPolicy {
    domain: String,
}

impl EmailDomainPolicy {
    /// Creates a policy for `domain` (a leading `@` is ignored).
    pub fn new(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        let domain = domain.trim().trim_start_matches('@').to_ascii_lowercase();
        Self { domain }
    }

    /// Returns the allowed domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Checks `email`, returning it trimmed with a lowercased domain part.
    ///
    /// Subdomains of the allowed domain are rejected.
    pub fn check(&self, email: &str) -> Result<String> {
        let email = email.trim();
        let (local, domain) = email
            .rsplit_once('@')
            .ok_or_else(|| DirectoryError::InvalidEmail(email.to_string()))?;

        if local.is_empty()
            || domain.is_empty()
            || local.contains('@')
            || email.chars().any(char::is_whitespace)
        {
            return Err(DirectoryError::InvalidEmail(email.to_string()));
        }

        let domain = domain.to_ascii_lowercase();
        if domain != self.domain {
            tracing::debug!(%email, allowed = %self.domain, "sign-up rejected by domain policy");
            return Err(DirectoryError::EmailDomainNotAllowed {
                email: email.to_string(),
                domain: self.domain.clone(),
            });
        }

        Ok(format!("{local}@{domain}"))
    }
}
