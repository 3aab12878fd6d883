//! Role dispatch for shared paths.
//!
//! A [`RoleDispatch`] is a static `(path, role) -> handler` table. Each path is
//! served by one axum route that picks the handler of the first signed-in role
//! in the priority order of a configured [`RoleGroup`](rollcall_auth::RoleGroup).
//! If no signed-in role has a handler, the client is redirected to sign in as
//! the first role (in priority order) that has one.
//!
//! ```rust,ignore
//! let dispatch = RoleDispatch::new("user")
//!     .route("/dashboard", Role::Student, get(student_dashboard))
//!     .route("/dashboard", Role::Teacher, get(teacher_dashboard));
//! let router: Router<AppState> = dispatch.into_router();
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRequestParts, Request, State},
    response::{IntoResponse, Response},
    routing::{MethodRouter, any},
};
use rollcall_core::{AppError, AuthError, Role};
use rollcall_observability::track_guard_redirect;
use tower::ServiceExt;

use crate::middleware::sessions::ActiveSessions;
use crate::state::AppState;

/// The role a dispatched request is being served as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingRole(pub Role);

pub struct RoleDispatch {
    group: String,
    routes: BTreeMap<String, BTreeMap<Role, MethodRouter<AppState>>>,
}

impl RoleDispatch {
    /// Table ordered by the priority of the role group named `group`.
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            routes: BTreeMap::new(),
        }
    }

    /// Registers `handler` for `role` on `path`, replacing any earlier entry
    /// for the same pair.
    pub fn route(mut self, path: &str, role: Role, handler: MethodRouter<AppState>) -> Self {
        self.routes
            .entry(path.to_string())
            .or_default()
            .insert(role, handler);
        self
    }

    /// Roles with a handler for `path`.
    pub fn roles_for(&self, path: &str) -> Vec<Role> {
        self.routes
            .get(path)
            .map(|handlers| handlers.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn into_router(self) -> Router<AppState> {
        let mut router = Router::new();
        for (path, handlers) in self.routes {
            let table = Arc::new(PathTable {
                group: self.group.clone(),
                path: path.clone(),
                handlers,
            });
            router = router.route(
                &path,
                any(move |State(state): State<AppState>, req: Request| {
                    let table = Arc::clone(&table);
                    async move { table.serve(state, req).await }
                }),
            );
        }
        router
    }
}

struct PathTable {
    group: String,
    path: String,
    handlers: BTreeMap<Role, MethodRouter<AppState>>,
}

impl PathTable {
    /// Roles with a handler, in the group's current priority order. Roles
    /// outside the group follow in declaration order.
    fn candidates(&self, state: &AppState) -> Vec<Role> {
        let mut order: Vec<Role> = state
            .role_groups
            .get(&self.group)
            .map(|group| group.roles().to_vec())
            .unwrap_or_default();
        for role in Role::ALL {
            if !order.contains(&role) {
                order.push(role);
            }
        }
        order
            .into_iter()
            .filter(|role| self.handlers.contains_key(role))
            .collect()
    }

    async fn serve(&self, state: AppState, req: Request) -> Response {
        let (mut parts, body) = req.into_parts();
        let active = match ActiveSessions::from_request_parts(&mut parts, &state).await {
            Ok(active) => active,
            Err(e) => return e.into_response(),
        };

        let candidates = self.candidates(&state);
        let Some(&first) = candidates.first() else {
            return AppError::not_found(anyhow::anyhow!("No handler for {}", self.path))
                .into_response();
        };

        let Some(role) = candidates.into_iter().find(|role| active.is_signed_in(*role)) else {
            track_guard_redirect(&self.group, first.as_str());
            return AuthError::Unauthenticated { role: first }.into_response();
        };

        let Some(handler) = self.handlers.get(&role).cloned() else {
            return AppError::not_found(anyhow::anyhow!("No handler for {}", self.path))
                .into_response();
        };

        tracing::debug!(path = %self.path, role = %role, "Dispatching by role");
        parts.extensions.insert(ActingRole(role));
        let req = Request::from_parts(parts, body);

        match handler.with_state::<()>(state).oneshot(req).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}
