//! Authentication DTOs.
//!
//! Request and response bodies for the per-role sign-in, sign-out, sign-up and
//! session endpoints.

use chrono::{DateTime, Utc};
use rollcall_core::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::accounts::AccountResponse;

// Re-export the session token claims from rollcall-auth
pub use rollcall_auth::SessionClaims;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(length(min = 1))]
    #[schema(example = "a@x.com")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Returned by sign-in and sign-up; the session itself travels in the role's
/// cookie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignInResponse {
    #[schema(example = "Signed in successfully.")]
    pub message: String,
    pub role: Role,
    pub account: AccountResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Describes how to sign in as a role. Unauthenticated requests are redirected
/// here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignInForm {
    pub role: Role,
    #[schema(example = "/students/sign_in")]
    pub action: String,
    #[schema(example = "POST")]
    pub method: String,
    pub fields: Vec<String>,
    #[schema(example = "/students/sign_up")]
    pub sign_up: String,
}

impl SignInForm {
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            action: role.sign_in_path().to_string(),
            method: "POST".to_string(),
            fields: vec!["email".to_string(), "password".to_string()],
            sign_up: format!("/{}/sign_up", role.scope()),
        }
    }
}

/// The current session of one role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub role: Role,
    pub account: AccountResponse,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Every role signed in on this request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WhoAmIResponse {
    pub roles: Vec<Role>,
    pub accounts: Vec<AccountResponse>,
}

/// Role-specific landing page data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub role: Role,
    pub greeting: String,
    pub account: AccountResponse,
    /// Role-specific links available from the dashboard.
    pub links: Vec<String>,
}
