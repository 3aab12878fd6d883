//! Session token claims.

use chrono::{DateTime, Utc};
use rollcall_core::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims signed into a role's session cookie.
///
/// The token only proves that the server issued it; the session it names
/// (`sid`) must still exist server-side for the holder to be signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    /// Account ID (subject claim)
    pub sub: String,
    /// Server-side session ID
    pub sid: String,
    pub email: String,
    /// Role scope the session was issued for
    pub role: Role,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl SessionClaims {
    pub fn new(
        session_id: Uuid,
        account_id: Uuid,
        email: &str,
        role: Role,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: account_id.to_string(),
            sid: session_id.to_string(),
            email: email.to_string(),
            role,
            exp: expires_at.timestamp().max(0) as usize,
            iat: issued_at.timestamp().max(0) as usize,
        }
    }

    pub fn account_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sid).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_serialize_role_as_snake_case() {
        let now = Utc::now();
        let claims = SessionClaims::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "a@x.com",
            Role::Student,
            now,
            now + Duration::hours(1),
        );
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""role":"student""#));
        assert!(serialized.contains(r#""email":"a@x.com""#));
    }

    #[test]
    fn test_claims_ids_parse_back() {
        let session_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = SessionClaims::new(session_id, account_id, "b@x.com", Role::Teacher, now, now);

        assert_eq!(claims.session_id(), Some(session_id));
        assert_eq!(claims.account_id(), Some(account_id));
        assert_eq!(claims.exp, claims.iat);
    }

    #[test]
    fn test_malformed_ids_are_none() {
        let json = r#"{"sub":"nope","sid":"nope","email":"c@x.com","role":"teacher","exp":9999999999,"iat":9999999900}"#;
        let claims: SessionClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.account_id(), None);
        assert_eq!(claims.session_id(), None);
    }
}
