//! Per-role session authentication.
//!
//! Each role has its own [`SessionAuthenticator`], cookie and server-side
//! session records, so signing in or out as one role never touches another.

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use rollcall_auth::{SessionClaims, create_session_token, verify_session_token_for};
use rollcall_config::SessionConfig;
use rollcall_core::{AuthError, Role};
use rollcall_db::{AccountStore, SessionRepository, Store, StoreError};
use rollcall_models::{Account, Session};
use rollcall_observability::{
    track_account_created, track_session_rejected, track_sessions_purged, track_sign_in_failure,
    track_sign_in_success, track_sign_out,
};
use tracing::instrument;

/// A freshly established session and the token to put in the role's cookie.
#[derive(Debug, Clone)]
pub struct SignedInSession {
    pub session: Session,
    pub account: Account,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    role: Role,
    accounts: AccountStore,
    sessions: Arc<dyn SessionRepository>,
    config: SessionConfig,
}

impl SessionAuthenticator {
    pub fn new(role: Role, store: &Store, config: SessionConfig) -> Self {
        Self {
            role,
            accounts: store.accounts.clone(),
            sessions: store.sessions.clone(),
            config,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Checks credentials against accounts of this role and opens a session.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unknown email, a wrong password,
    /// or an account that belongs to another role.
    #[instrument(skip(self, password), fields(role = %self.role))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedInSession, AuthError> {
        let account = match self.accounts.authenticate(email, password, self.role).await {
            Ok(account) => account,
            Err(e) => {
                if matches!(e, AuthError::InvalidCredentials) {
                    track_sign_in_failure(self.role.as_str(), "invalid_credentials");
                    tracing::warn!(role = %self.role, "Sign-in rejected");
                }
                return Err(e);
            }
        };

        let signed_in = self.start_session(account).await?;
        track_sign_in_success(self.role.as_str());
        tracing::info!(
            account_id = %signed_in.account.id,
            session_id = %signed_in.session.id,
            role = %self.role,
            "Signed in"
        );
        Ok(signed_in)
    }

    /// Registers an account with this role and signs it in.
    #[instrument(skip(self, password), fields(role = %self.role))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignedInSession, AuthError> {
        let account = self.accounts.create(email, password, name, self.role).await?;
        track_account_created(self.role.as_str());
        self.start_session(account).await
    }

    /// Ends the session. Signing out an already removed session is a no-op.
    #[instrument(skip(self, session), fields(role = %self.role, session_id = %session.id))]
    pub async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        if self.sessions.delete(session.id).await? {
            track_sign_out(self.role.as_str());
            tracing::info!(account_id = %session.account_id, "Signed out");
        }
        Ok(())
    }

    /// The live session carried by this role's cookie, if any.
    ///
    /// Missing, forged, expired and revoked sessions are all "signed out", as
    /// is a token issued for another role.
    pub async fn current_session(&self, jar: &CookieJar) -> Result<Option<Session>, AuthError> {
        let Some(cookie) = jar.get(self.role.cookie_name()) else {
            return Ok(None);
        };

        let claims = match verify_session_token_for(cookie.value(), self.role, &self.config) {
            Ok(claims) => claims,
            Err(AuthError::RoleMismatch { found, .. }) => {
                self.reject("role_mismatch");
                tracing::warn!(expected = %self.role, found = %found, "Session token presented under the wrong role");
                return Ok(None);
            }
            Err(_) => {
                self.reject("invalid_token");
                return Ok(None);
            }
        };

        let (Some(session_id), Some(account_id)) = (claims.session_id(), claims.account_id())
        else {
            self.reject("invalid_token");
            return Ok(None);
        };

        let Some(session) = self.sessions.find(session_id).await? else {
            self.reject("revoked");
            return Ok(None);
        };

        if session.role != self.role || session.account_id != account_id {
            self.reject("mismatched_record");
            return Ok(None);
        }

        if session.is_expired(Utc::now()) {
            self.reject("expired");
            self.sessions.delete(session.id).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub async fn is_signed_in(&self, jar: &CookieJar) -> Result<bool, AuthError> {
        Ok(self.current_session(jar).await?.is_some())
    }

    /// The account behind the current session, if any.
    pub async fn current_account(&self, jar: &CookieJar) -> Result<Option<Account>, AuthError> {
        let Some(session) = self.current_session(jar).await? else {
            return Ok(None);
        };
        self.account_for(&session).await
    }

    /// The account a session belongs to. `None` if it has been deleted.
    pub async fn account_for(&self, session: &Session) -> Result<Option<Account>, AuthError> {
        match self.accounts.find_by_id(session.account_id).await {
            Ok(account) => Ok(Some(account)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Signs out the session currently held in the cookie, unless it is `keep`.
    pub async fn revoke_previous(&self, jar: &CookieJar, keep: &Session) -> Result<(), AuthError> {
        if let Some(previous) = self.current_session(jar).await?
            && previous.id != keep.id
        {
            self.sign_out(&previous).await?;
        }
        Ok(())
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.role.cookie_name(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.cookie_secure)
            .build()
    }

    /// Cookie to pass to [`CookieJar::remove`] to clear this role's session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(self.role.cookie_name()).path("/").build()
    }

    async fn start_session(&self, account: Account) -> Result<SignedInSession, AuthError> {
        let session = Session::new(account.id, self.role, Utc::now(), self.config.ttl_secs);
        self.sessions.insert(&session).await?;

        let claims = SessionClaims::new(
            session.id,
            account.id,
            &account.email,
            self.role,
            session.issued_at,
            session.expires_at,
        );
        let token = create_session_token(&claims, &self.config)
            .map_err(|e| AuthError::Internal(e.error))?;

        Ok(SignedInSession {
            session,
            account,
            token,
        })
    }

    fn reject(&self, reason: &str) {
        track_session_rejected(self.role.as_str(), reason);
        tracing::debug!(role = %self.role, reason, "Session cookie not honoured");
    }
}

/// Deletes expired sessions of every role.
pub async fn purge_expired_sessions(store: &Store) -> Result<u64, StoreError> {
    let purged = store.sessions.purge_expired(Utc::now()).await?;
    if purged > 0 {
        track_sessions_purged(purged);
        tracing::info!(purged, "Purged expired sessions");
    }
    Ok(purged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::memory(4)
    }

    fn config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            ..SessionConfig::default()
        }
    }

    fn jar_with(cookie: Cookie<'static>) -> CookieJar {
        CookieJar::new().add(cookie)
    }

    #[tokio::test]
    async fn test_sign_in_sets_only_own_role() {
        let store = store();
        store
            .accounts
            .create("a@x.com", "pw1", "Ada", Role::Student)
            .await
            .unwrap();

        let students = SessionAuthenticator::new(Role::Student, &store, config());
        let teachers = SessionAuthenticator::new(Role::Teacher, &store, config());

        let signed_in = students.sign_in("a@x.com", "pw1").await.unwrap();
        let jar = jar_with(students.session_cookie(signed_in.token));

        assert!(students.is_signed_in(&jar).await.unwrap());
        assert!(!teachers.is_signed_in(&jar).await.unwrap());

        let account = students.current_account(&jar).await.unwrap().unwrap();
        assert_eq!(account.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_sign_in_with_other_roles_account_fails() {
        let store = store();
        store
            .accounts
            .create("a@x.com", "pw1", "Ada", Role::Student)
            .await
            .unwrap();

        let teachers = SessionAuthenticator::new(Role::Teacher, &store, config());
        assert!(matches!(
            teachers.sign_in("a@x.com", "pw1").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_token_under_other_roles_cookie_is_ignored() {
        let store = store();
        store
            .accounts
            .create("a@x.com", "pw1", "Ada", Role::Student)
            .await
            .unwrap();

        let students = SessionAuthenticator::new(Role::Student, &store, config());
        let teachers = SessionAuthenticator::new(Role::Teacher, &store, config());
        let signed_in = students.sign_in("a@x.com", "pw1").await.unwrap();

        let jar = jar_with(teachers.session_cookie(signed_in.token));
        assert_eq!(teachers.current_session(&jar).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out_is_idempotent() {
        let store = store();
        store
            .accounts
            .create("b@x.com", "pw2", "Bob", Role::Teacher)
            .await
            .unwrap();

        let teachers = SessionAuthenticator::new(Role::Teacher, &store, config());
        let signed_in = teachers.sign_in("b@x.com", "pw2").await.unwrap();
        let jar = jar_with(teachers.session_cookie(signed_in.token));

        teachers.sign_out(&signed_in.session).await.unwrap();
        teachers.sign_out(&signed_in.session).await.unwrap();
        assert!(!teachers.is_signed_in(&jar).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_session_is_signed_out() {
        let store = store();
        store
            .accounts
            .create("a@x.com", "pw1", "Ada", Role::Student)
            .await
            .unwrap();

        let expiring = SessionConfig {
            ttl_secs: 0,
            ..config()
        };
        let students = SessionAuthenticator::new(Role::Student, &store, expiring);
        let signed_in = students.sign_in("a@x.com", "pw1").await.unwrap();
        let jar = jar_with(students.session_cookie(signed_in.token));

        assert!(!students.is_signed_in(&jar).await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_previous_keeps_new_session() {
        let store = store();
        store
            .accounts
            .create("a@x.com", "pw1", "Ada", Role::Student)
            .await
            .unwrap();

        let students = SessionAuthenticator::new(Role::Student, &store, config());
        let first = students.sign_in("a@x.com", "pw1").await.unwrap();
        let old_jar = jar_with(students.session_cookie(first.token.clone()));

        let second = students.sign_in("a@x.com", "pw1").await.unwrap();
        students
            .revoke_previous(&old_jar, &second.session)
            .await
            .unwrap();

        assert!(!students.is_signed_in(&old_jar).await.unwrap());
        let new_jar = jar_with(students.session_cookie(second.token));
        assert!(students.is_signed_in(&new_jar).await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_expired_sessions() {
        let store = store();
        let account = store
            .accounts
            .create("a@x.com", "pw1", "Ada", Role::Student)
            .await
            .unwrap();
        let stale = Session::new(account.id, Role::Student, Utc::now(), 0);
        store.sessions.insert(&stale).await.unwrap();

        assert_eq!(purge_expired_sessions(&store).await.unwrap(), 1);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let store = store();
        let auth = SessionAuthenticator::new(Role::Teacher, &store, config());
        let cookie = auth.session_cookie("token".to_string());

        assert_eq!(cookie.name(), "teacher_session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
