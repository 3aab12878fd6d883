//! Role group guard.
//!
//! Wraps routes that any member of a [`RoleGroup`] may use. When none of the
//! group's roles is signed in, the request is redirected (303) to the sign-in
//! page of the group's first role.
//!
//! ```rust,ignore
//! use axum::{Router, middleware, routing::get};
//! use crate::middleware::guard::{GroupGuard, require_group};
//!
//! let routes = Router::new()
//!     .route("/whoami", get(whoami))
//!     .route_layer(middleware::from_fn_with_state(
//!         GroupGuard::named(state.clone(), "user"),
//!         require_group,
//!     ));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use rollcall_auth::RoleGroup;
use rollcall_core::{AppError, Role};
use rollcall_observability::track_guard_redirect;

use crate::middleware::sessions::ActiveSessions;
use crate::state::AppState;

/// Signed-in roles of the guarded group, in the group's priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoles(pub Vec<Role>);

#[derive(Debug, Clone)]
pub struct GroupGuard {
    state: AppState,
    /// Looked up in [`AppState::role_groups`] on each request.
    group: String,
}

impl GroupGuard {
    /// Guard for a configured group.
    pub fn named(state: AppState, group: impl Into<String>) -> Self {
        Self {
            state,
            group: group.into(),
        }
    }

    fn group(&self) -> Result<RoleGroup, AppError> {
        self.state.role_groups.get(&self.group).cloned().ok_or_else(|| {
            AppError::internal_error(format!("Role group `{}` is not configured", self.group))
        })
    }
}

/// Lets the request through when any role of the group is signed in and
/// exposes the signed-in members as [`ActiveRoles`].
pub async fn require_group(
    State(guard): State<GroupGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let group = guard.group()?;

    let (mut parts, body) = req.into_parts();
    let active = ActiveSessions::from_request_parts(&mut parts, &guard.state).await?;

    let roles = group.authorize(&active.roles()).inspect_err(|e| {
        if let Some(role) = e.sign_in_role() {
            track_guard_redirect(group.name(), role.as_str());
            tracing::debug!(group = group.name(), role = %role, "Guard redirecting to sign-in");
        }
    })?;

    parts.extensions.insert(ActiveRoles(roles));
    Ok(next.run(Request::from_parts(parts, body)).await)
}
