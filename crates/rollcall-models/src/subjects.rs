//! Subject and enrollment models.
//!
//! Teachers own subjects; students enroll in them. These back the
//! `/dashboard/subjects` routes, which serve each role differently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 120))]
    #[schema(example = "Mathematics")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EnrollRequest {
    pub subject_id: Uuid,
}

/// Subjects visible to the acting role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubjectListResponse {
    pub role: rollcall_core::Role,
    pub subjects: Vec<Subject>,
}
