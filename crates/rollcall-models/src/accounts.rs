//! Account domain models and DTOs.
//!
//! Students and teachers share one accounts table; the `role` column tells
//! them apart and never changes after the row is created.

use chrono::{DateTime, Utc};
use rollcall_core::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A stored account.
///
/// `password_hash` is a salted bcrypt hash and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Values for inserting an account, after hashing and email normalization.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

/// Lower-cased, trimmed email used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration payload. The role comes from the URL scope, not the body.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(email)]
    #[schema(example = "a@x.com")]
    pub email: String,
    #[validate(length(min = 3, max = 128))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            role: account.role,
            created_at: account.created_at,
        }
    }
}
