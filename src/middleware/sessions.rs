use std::fmt;
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use rollcall_core::{AppError, AuthError, Role};
use rollcall_models::{Account, Session};

use crate::state::AppState;

/// Roles signed in on the current request.
///
/// Resolved once per request from the role cookies and cached in the request
/// extensions, so guards, dispatch and handlers all see the same answer.
#[derive(Debug, Clone, Default)]
pub struct ActiveSessions {
    sessions: Vec<Session>,
}

impl ActiveSessions {
    /// Checks every role's cookie.
    pub async fn resolve(state: &AppState, jar: &CookieJar) -> Result<Self, AuthError> {
        let mut sessions = Vec::new();
        for role in Role::ALL {
            if let Some(session) = state.authenticator(role).current_session(jar).await? {
                sessions.push(session);
            }
        }
        Ok(Self { sessions })
    }

    pub fn is_signed_in(&self, role: Role) -> bool {
        self.session(role).is_some()
    }

    pub fn session(&self, role: Role) -> Option<&Session> {
        self.sessions.iter().find(|s| s.role == role)
    }

    /// Signed-in roles in declaration order.
    pub fn roles(&self) -> Vec<Role> {
        self.sessions.iter().map(|s| s.role).collect()
    }
}

impl FromRequestParts<AppState> for ActiveSessions {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<ActiveSessions>() {
            return Ok(cached.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let active = ActiveSessions::resolve(state, &jar).await?;
        parts.extensions.insert(active.clone());
        Ok(active)
    }
}

/// The role named by the `{scope}` path segment (`students`, `teachers`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeRole(pub Role);

impl<S> FromRequestParts<S> for ScopeRole
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(scope) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found(anyhow::anyhow!("Not found")))?;

        Role::from_scope(&scope)
            .map(ScopeRole)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Unknown scope: {}", scope)))
    }
}

/// Compile-time role marker for [`SignedIn`].
pub trait Scope: Send + Sync + 'static {
    const ROLE: Role;
}

#[derive(Debug, Clone, Copy)]
pub struct Students;

impl Scope for Students {
    const ROLE: Role = Role::Student;
}

#[derive(Debug, Clone, Copy)]
pub struct Teachers;

impl Scope for Teachers {
    const ROLE: Role = Role::Teacher;
}

/// The signed-in account of one role.
///
/// Rejects with a redirect to that role's sign-in page when the role has no
/// session, whatever other roles are signed in.
///
/// ```ignore
/// async fn teacher_only(SignedIn { account, .. }: SignedIn<Teachers>) -> String {
///     account.name
/// }
/// ```
pub struct SignedIn<S: Scope> {
    pub session: Session,
    pub account: Account,
    _scope: PhantomData<S>,
}

impl<S: Scope> fmt::Debug for SignedIn<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedIn")
            .field("role", &S::ROLE)
            .field("session", &self.session.id)
            .field("account", &self.account.id)
            .finish()
    }
}

impl<S: Scope> Clone for SignedIn<S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            account: self.account.clone(),
            _scope: PhantomData,
        }
    }
}

impl<S: Scope> FromRequestParts<AppState> for SignedIn<S> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let active = ActiveSessions::from_request_parts(parts, state).await?;
        let session = active
            .session(S::ROLE)
            .cloned()
            .ok_or(AuthError::Unauthenticated { role: S::ROLE })?;

        let account = state
            .authenticator(S::ROLE)
            .account_for(&session)
            .await?
            .ok_or(AuthError::Unauthenticated { role: S::ROLE })?;

        Ok(Self {
            session,
            account,
            _scope: PhantomData,
        })
    }
}
