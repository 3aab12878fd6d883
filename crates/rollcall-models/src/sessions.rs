//! Server-side session records.

use chrono::{DateTime, TimeDelta, Utc};
use rollcall_core::Role;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One role's signed-in session for an account.
///
/// The cookie only carries a signed reference to this record; deleting the
/// record signs the role out even while the cookie is still present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub account_id: Uuid,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Starts a session at `issued_at` lasting `ttl_secs` seconds.
    ///
    /// Negative lifetimes count as zero; lifetimes past the representable
    /// range expire at [`DateTime::<Utc>::MAX_UTC`].
    pub fn new(account_id: Uuid, role: Role, issued_at: DateTime<Utc>, ttl_secs: i64) -> Self {
        let expires_at = TimeDelta::try_seconds(ttl_secs.max(0))
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            id: Uuid::new_v4(),
            account_id,
            role,
            issued_at,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
