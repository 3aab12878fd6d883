use axum::routing::get;
use rollcall_core::Role;

use crate::dispatch::RoleDispatch;

use super::controller::{create_subject, enroll, list_available, list_enrolled, list_taught};

/// Registers the subject routes of each role on `dispatch`.
pub fn register_subject_routes(dispatch: RoleDispatch) -> RoleDispatch {
    dispatch
        .route(
            "/dashboard/subjects",
            Role::Teacher,
            get(list_taught).post(create_subject),
        )
        .route(
            "/dashboard/subjects",
            Role::Student,
            get(list_enrolled).post(enroll),
        )
        .route(
            "/dashboard/subjects/available",
            Role::Student,
            get(list_available),
        )
}
