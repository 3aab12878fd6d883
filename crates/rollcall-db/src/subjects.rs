//! Subjects and enrollments.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use rollcall_models::{Enrollment, Subject};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

#[async_trait]
pub trait SubjectRepository: Send + Sync + fmt::Debug {
    async fn create(&self, teacher_id: Uuid, name: &str) -> Result<Subject, StoreError>;

    /// The whole catalog, ordered by name.
    async fn list_all(&self) -> Result<Vec<Subject>, StoreError>;

    async fn list_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Subject>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Subject>, StoreError>;

    /// Enrolls the student. Enrolling twice returns the existing enrollment.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the subject does not exist.
    async fn enroll(&self, student_id: Uuid, subject_id: Uuid) -> Result<Enrollment, StoreError>;

    async fn list_enrolled(&self, student_id: Uuid) -> Result<Vec<Subject>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgSubjectRepository {
    pool: PgPool,
}

impl PgSubjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubjectRepository for PgSubjectRepository {
    async fn create(&self, teacher_id: Uuid, name: &str) -> Result<Subject, StoreError> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name, teacher_id)
             VALUES ($1, $2)
             RETURNING id, name, teacher_id, created_at",
        )
        .bind(name)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    async fn list_all(&self) -> Result<Vec<Subject>, StoreError> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, name, teacher_id, created_at FROM subjects ORDER BY name, created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    async fn list_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Subject>, StoreError> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, name, teacher_id, created_at FROM subjects
             WHERE teacher_id = $1
             ORDER BY name, created_at",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Subject>, StoreError> {
        let subject = sqlx::query_as::<_, Subject>(
            "SELECT id, name, teacher_id, created_at FROM subjects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    async fn enroll(&self, student_id: Uuid, subject_id: Uuid) -> Result<Enrollment, StoreError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (student_id, subject_id)
             VALUES ($1, $2)
             ON CONFLICT (student_id, subject_id)
             DO UPDATE SET student_id = EXCLUDED.student_id
             RETURNING student_id, subject_id, enrolled_at",
        )
        .bind(student_id)
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return StoreError::NotFound;
            }
            StoreError::from(e)
        })
    }

    async fn list_enrolled(&self, student_id: Uuid) -> Result<Vec<Subject>, StoreError> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT s.id, s.name, s.teacher_id, s.created_at
             FROM subjects s
             JOIN enrollments e ON e.subject_id = s.id
             WHERE e.student_id = $1
             ORDER BY s.name, s.created_at",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }
}

#[derive(Debug, Default)]
struct SubjectTables {
    subjects: HashMap<Uuid, Subject>,
    enrollments: Vec<Enrollment>,
}

#[derive(Debug, Default)]
pub struct MemorySubjectRepository {
    tables: RwLock<SubjectTables>,
}

impl MemorySubjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut subjects: Vec<Subject>) -> Vec<Subject> {
    subjects.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));
    subjects
}

#[async_trait]
impl SubjectRepository for MemorySubjectRepository {
    async fn create(&self, teacher_id: Uuid, name: &str) -> Result<Subject, StoreError> {
        let subject = Subject {
            id: Uuid::new_v4(),
            name: name.to_string(),
            teacher_id,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .subjects
            .insert(subject.id, subject.clone());
        Ok(subject)
    }

    async fn list_all(&self) -> Result<Vec<Subject>, StoreError> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.subjects.values().cloned().collect()))
    }

    async fn list_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Subject>, StoreError> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .subjects
                .values()
                .filter(|s| s.teacher_id == teacher_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Subject>, StoreError> {
        Ok(self.tables.read().await.subjects.get(&id).cloned())
    }

    async fn enroll(&self, student_id: Uuid, subject_id: Uuid) -> Result<Enrollment, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.subjects.contains_key(&subject_id) {
            return Err(StoreError::NotFound);
        }

        if let Some(existing) = tables
            .enrollments
            .iter()
            .find(|e| e.student_id == student_id && e.subject_id == subject_id)
        {
            return Ok(existing.clone());
        }

        let enrollment = Enrollment {
            student_id,
            subject_id,
            enrolled_at: Utc::now(),
        };
        tables.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn list_enrolled(&self, student_id: Uuid) -> Result<Vec<Subject>, StoreError> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .enrollments
                .iter()
                .filter(|e| e.student_id == student_id)
                .filter_map(|e| tables.subjects.get(&e.subject_id).cloned())
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_teacher_lists_only_own_subjects() {
        let repo = MemorySubjectRepository::new();
        let teacher = Uuid::new_v4();
        let other = Uuid::new_v4();

        repo.create(teacher, "Physics").await.unwrap();
        repo.create(teacher, "Algebra").await.unwrap();
        repo.create(other, "History").await.unwrap();

        let names: Vec<String> = repo
            .list_for_teacher(teacher)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Algebra", "Physics"]);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_enroll_is_idempotent() {
        let repo = MemorySubjectRepository::new();
        let subject = repo.create(Uuid::new_v4(), "Physics").await.unwrap();
        let student = Uuid::new_v4();

        let first = repo.enroll(student, subject.id).await.unwrap();
        let second = repo.enroll(student, subject.id).await.unwrap();
        assert_eq!(first, second);

        assert_eq!(repo.list_enrolled(student).await.unwrap(), vec![subject]);
    }

    #[tokio::test]
    async fn test_enroll_unknown_subject_is_not_found() {
        let repo = MemorySubjectRepository::new();
        assert!(matches!(
            repo.enroll(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
    }

    async fn insert_account(pool: &PgPool, email: &str, role: &str) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO accounts (email, password_hash, name, role)
             VALUES ($1, 'not-a-real-hash', 'Test', $2)
             RETURNING id",
        )
        .bind(email)
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_pg_enroll_twice_returns_existing_enrollment(pool: PgPool) {
        let teacher = insert_account(&pool, "t@x.com", "teacher").await;
        let student = insert_account(&pool, "s@x.com", "student").await;
        let repo = PgSubjectRepository::new(pool);
        let subject = repo.create(teacher, "Physics").await.unwrap();

        let first = repo.enroll(student, subject.id).await.unwrap();
        let second = repo.enroll(student, subject.id).await.unwrap();
        assert_eq!(first, second);

        let enrolled = repo.list_enrolled(student).await.unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0].id, subject.id);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_pg_enroll_in_unknown_subject(pool: PgPool) {
        let student = insert_account(&pool, "s@x.com", "student").await;
        let repo = PgSubjectRepository::new(pool);

        assert!(matches!(
            repo.enroll(student, Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
        assert!(repo.list_enrolled(student).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_pg_subjects_are_listed_by_name(pool: PgPool) {
        let teacher = insert_account(&pool, "t@x.com", "teacher").await;
        let other = insert_account(&pool, "o@x.com", "teacher").await;
        let repo = PgSubjectRepository::new(pool);

        repo.create(teacher, "Physics").await.unwrap();
        repo.create(teacher, "Algebra").await.unwrap();
        let history = repo.create(other, "History").await.unwrap();

        let own: Vec<String> = repo
            .list_for_teacher(teacher)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(own, vec!["Algebra", "Physics"]);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
        assert_eq!(repo.find(history.id).await.unwrap().unwrap().teacher_id, other);
    }
}
