//! Route handlers, grouped by resource.

pub mod account;
pub mod browse;
pub mod people;
pub mod roster;
pub mod system;

use axum::http::HeaderMap;
use directory::{Permission, Role};

use crate::error::ApiError;

/// Header carrying the caller's role, set by the session layer in front of us.
pub const ROLE_HEADER: &str = "x-role";

/// Reads the caller's role; requests without the header are guests.
pub(crate) fn caller_role(headers: &HeaderMap) -> Result<Role, ApiError> {
    match headers.get(ROLE_HEADER) {
        None => Ok(Role::Guest),
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| ApiError::BadRequest(format!("{ROLE_HEADER} is not valid text")))?;
            Ok(value.parse::<Role>()?)
        }
    }
}

/// Fails with 403 unless `role` grants `permission`.
pub(crate) fn require(role: Role, permission: Permission) -> Result<(), ApiError> {
    if role.can(permission) {
        Ok(())
    } else {
        Err(ApiError::Forbidden { role, permission })
    }
}
