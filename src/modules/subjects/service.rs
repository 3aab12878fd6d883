use anyhow::anyhow;
use rollcall_core::AppError;
use rollcall_db::{Store, StoreError};
use rollcall_models::{Account, Enrollment, Subject};
use tracing::instrument;
use uuid::Uuid;

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(store, teacher), fields(teacher_id = %teacher.id))]
    pub async fn create_subject(
        store: &Store,
        teacher: &Account,
        name: &str,
    ) -> Result<Subject, AppError> {
        let subject = store.subjects.create(teacher.id, name.trim()).await?;
        tracing::info!(subject_id = %subject.id, "Subject created");
        Ok(subject)
    }

    pub async fn list_taught(store: &Store, teacher: &Account) -> Result<Vec<Subject>, AppError> {
        Ok(store.subjects.list_for_teacher(teacher.id).await?)
    }

    pub async fn list_enrolled(store: &Store, student: &Account) -> Result<Vec<Subject>, AppError> {
        Ok(store.subjects.list_enrolled(student.id).await?)
    }

    pub async fn list_available(store: &Store) -> Result<Vec<Subject>, AppError> {
        Ok(store.subjects.list_all().await?)
    }

    /// Enrolls the student. Enrolling twice returns the original enrollment.
    #[instrument(skip(store, student), fields(student_id = %student.id))]
    pub async fn enroll(
        store: &Store,
        student: &Account,
        subject_id: Uuid,
    ) -> Result<Enrollment, AppError> {
        if store.subjects.find(subject_id).await?.is_none() {
            return Err(AppError::not_found(anyhow!("Subject not found")));
        }

        match store.subjects.enroll(student.id, subject_id).await {
            Ok(enrollment) => {
                tracing::info!("Enrolled in subject");
                Ok(enrollment)
            }
            Err(StoreError::NotFound) => Err(AppError::not_found(anyhow!("Subject not found"))),
            Err(e) => Err(e.into()),
        }
    }
}
