//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use directory::{DirectoryError, Permission, Role};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// The caller's role lacks a permission.
    Forbidden { role: Role, permission: Permission },
    /// Invalid directory input (sort key, role, email, preference).
    Directory(DirectoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden { role, permission } => {
                tracing::warn!(%role, ?permission, "permission denied");
                (
                    StatusCode::FORBIDDEN,
                    format!("Role {role} may not {permission:?}"),
                )
            }
            ApiError::Directory(err) => directory_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn directory_error_to_response(err: DirectoryError) -> (StatusCode, String) {
    match &err {
        DirectoryError::EmailDomainNotAllowed { .. } => (StatusCode::FORBIDDEN, err.to_string()),
        DirectoryError::InvalidSortKey(_)
        | DirectoryError::UnknownRole(_)
        | DirectoryError::InvalidEmail(_)
        | DirectoryError::InvalidPreference { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        ApiError::Directory(err)
    }
}
