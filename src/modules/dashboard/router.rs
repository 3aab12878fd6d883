use axum::{Router, middleware, routing::get};
use rollcall_auth::DEFAULT_GROUP;
use rollcall_core::Role;

use crate::dispatch::RoleDispatch;
use crate::middleware::guard::{GroupGuard, require_group};
use crate::modules::subjects::router::register_subject_routes;
use crate::state::AppState;

use super::controller::{landing, student_dashboard, teacher_dashboard, whoami};

/// Group whose priority orders the shared dashboard routes.
pub const USER_GROUP: &str = DEFAULT_GROUP;

pub fn init_landing_router() -> Router<AppState> {
    Router::new().route("/", get(landing))
}

pub fn init_whoami_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(
            GroupGuard::named(state, USER_GROUP),
            require_group,
        ))
}

/// The `(path, role)` table behind `/dashboard`.
pub fn init_dashboard_dispatch() -> RoleDispatch {
    let dispatch = RoleDispatch::new(USER_GROUP)
        .route("/dashboard", Role::Student, get(student_dashboard))
        .route("/dashboard", Role::Teacher, get(teacher_dashboard));
    register_subject_routes(dispatch)
}

pub fn init_dashboard_router() -> Router<AppState> {
    init_dashboard_dispatch().into_router()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_table() {
        let dispatch = init_dashboard_dispatch();
        assert_eq!(
            dispatch.roles_for("/dashboard"),
            vec![Role::Student, Role::Teacher]
        );
        assert_eq!(
            dispatch.roles_for("/dashboard/subjects"),
            vec![Role::Student, Role::Teacher]
        );
        assert_eq!(
            dispatch.roles_for("/dashboard/subjects/available"),
            vec![Role::Student]
        );
    }
}
