//! Error types.
//!
//! [`AppError`] is the HTTP-facing error returned by handlers: a status code plus
//! an `anyhow` error rendered as `{"error": "..."}`. [`AuthError`] is the domain
//! error of the authentication subsystem; it converts into an [`AppError`] and
//! carries redirect semantics for unauthenticated access.

use anyhow::Error;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::roles::Role;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    /// Redirect target, set for `303 See Other` responses.
    pub location: Option<String>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            location: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::internal(anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn too_many_requests(message: String) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, anyhow::anyhow!(message))
    }

    /// `303 See Other` pointing the client at `location`.
    pub fn redirect(location: impl Into<String>, message: String) -> Self {
        Self {
            status: StatusCode::SEE_OTHER,
            error: anyhow::anyhow!(message),
            location: Some(location.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body = Json(json!({
            "error": self.error.to_string()
        }));

        match self.location {
            Some(location) => (self.status, [(header::LOCATION, location)], body).into_response(),
            None => (self.status, body).into_response(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}

/// Failures of the account, session and guard layers.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Sign-up with an email already used by any role.
    #[error("Email has already been taken")]
    DuplicateEmail,

    /// Unknown email, wrong password, or an account of another role.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// No session for the role; the client is sent to its sign-in page.
    #[error("You need to sign in or sign up before continuing.")]
    Unauthenticated { role: Role },

    /// A session token presented under the wrong role scope.
    #[error("Session belongs to the {found} scope, expected {expected}")]
    RoleMismatch { expected: Role, found: Role },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Role whose sign-in page resolves this error, if it is a redirect.
    pub fn sign_in_role(&self) -> Option<Role> {
        match self {
            AuthError::Unauthenticated { role } => Some(*role),
            AuthError::RoleMismatch { expected, .. } => Some(*expected),
            _ => None,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail => AppError::unprocessable(err),
            AuthError::InvalidCredentials => AppError::unauthorized(err.to_string()),
            AuthError::Unauthenticated { role } => {
                AppError::redirect(role.sign_in_path(), err.to_string())
            }
            // The mismatched session is ignored; the client re-authenticates.
            AuthError::RoleMismatch { expected, .. } => AppError::redirect(
                expected.sign_in_path(),
                AuthError::Unauthenticated { role: expected }.to_string(),
            ),
            AuthError::Internal(e) => AppError::internal(e),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
