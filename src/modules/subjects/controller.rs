use axum::{Extension, Json, extract::State, http::StatusCode};
use rollcall_core::{AppError, Role};
use rollcall_models::{
    CreateSubjectRequest, EnrollRequest, Enrollment, Subject, SubjectListResponse,
};

use crate::dispatch::ActingRole;
use crate::middleware::sessions::{SignedIn, Students, Teachers};
use crate::modules::sessions::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::SubjectService;

/// Subjects of the acting role
///
/// Served by role: a teacher sees the subjects they teach, a student the
/// subjects they are enrolled in. When both are signed in, the first role of
/// the `user` group wins.
#[utoipa::path(
    get,
    path = "/dashboard/subjects",
    responses(
        (status = 200, description = "Subjects of the acting role", body = SubjectListResponse),
        (status = 303, description = "No role signed in; redirects to sign-in")
    ),
    tag = "Subjects"
)]
pub async fn list_taught(
    State(state): State<AppState>,
    SignedIn { account, .. }: SignedIn<Teachers>,
) -> Result<Json<SubjectListResponse>, AppError> {
    let subjects = SubjectService::list_taught(&state.store, &account).await?;
    Ok(Json(SubjectListResponse {
        role: Role::Teacher,
        subjects,
    }))
}

pub async fn list_enrolled(
    State(state): State<AppState>,
    SignedIn { account, .. }: SignedIn<Students>,
) -> Result<Json<SubjectListResponse>, AppError> {
    let subjects = SubjectService::list_enrolled(&state.store, &account).await?;
    Ok(Json(SubjectListResponse {
        role: Role::Student,
        subjects,
    }))
}

/// Create a subject (teacher) or enroll in one (student)
///
/// Teachers send `{"name": ...}` and get the new subject; students send
/// `{"subject_id": ...}` and get the enrollment. Enrolling twice is harmless.
#[utoipa::path(
    post,
    path = "/dashboard/subjects",
    request_body(content = CreateSubjectRequest, description = "Teacher: subject to create. Student: `EnrollRequest`."),
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 200, description = "Enrolled", body = Enrollment),
        (status = 303, description = "No role signed in; redirects to sign-in"),
        (status = 404, description = "Unknown subject", body = ErrorResponse),
        (status = 422, description = "Invalid fields", body = ErrorResponse)
    ),
    tag = "Subjects"
)]
pub async fn create_subject(
    State(state): State<AppState>,
    SignedIn { account, .. }: SignedIn<Teachers>,
    ValidatedJson(dto): ValidatedJson<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = SubjectService::create_subject(&state.store, &account, &dto.name).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn enroll(
    State(state): State<AppState>,
    SignedIn { account, .. }: SignedIn<Students>,
    ValidatedJson(dto): ValidatedJson<EnrollRequest>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = SubjectService::enroll(&state.store, &account, dto.subject_id).await?;
    Ok(Json(enrollment))
}

/// Subject catalog (students only)
#[utoipa::path(
    get,
    path = "/dashboard/subjects/available",
    responses(
        (status = 200, description = "Every subject", body = SubjectListResponse),
        (status = 303, description = "Not signed in as a student; redirects to sign-in")
    ),
    tag = "Subjects"
)]
pub async fn list_available(
    State(state): State<AppState>,
    Extension(ActingRole(role)): Extension<ActingRole>,
) -> Result<Json<SubjectListResponse>, AppError> {
    let subjects = SubjectService::list_available(&state.store).await?;
    Ok(Json(SubjectListResponse { role, subjects }))
}
