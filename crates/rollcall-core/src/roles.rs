//! The role discriminator.
//!
//! Every account carries exactly one [`Role`], fixed at creation. The role also
//! names the URL scope (`/students/...`, `/teachers/...`) and the cookie that
//! carries the role's session, so two roles never share session state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account subtype stored in the shared accounts table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 2] = [Role::Student, Role::Teacher];

    /// Value stored in the `role` column and carried in session tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }

    /// URL path segment for the role's authentication routes.
    pub fn scope(&self) -> &'static str {
        match self {
            Role::Student => "students",
            Role::Teacher => "teachers",
        }
    }

    /// Name of the cookie holding this role's session token.
    pub fn cookie_name(&self) -> &'static str {
        match self {
            Role::Student => "student_session",
            Role::Teacher => "teacher_session",
        }
    }

    pub fn sign_in_path(&self) -> &'static str {
        match self {
            Role::Student => "/students/sign_in",
            Role::Teacher => "/teachers/sign_in",
        }
    }

    /// Resolves a role from its scope segment (`students`, `teachers`).
    pub fn from_scope(scope: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.scope() == scope)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

// Lets `sqlx::FromRow` decode the TEXT `role` column with `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" Teacher ".parse::<Role>().unwrap(), Role::Teacher);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_scope_and_cookie_are_distinct_per_role() {
        assert_ne!(Role::Student.cookie_name(), Role::Teacher.cookie_name());
        assert_eq!(Role::from_scope("teachers"), Some(Role::Teacher));
        assert_eq!(Role::from_scope("admins"), None);
        assert_eq!(Role::Student.sign_in_path(), "/students/sign_in");
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), r#""teacher""#);
    }
}
