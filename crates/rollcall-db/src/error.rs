use rollcall_core::{AppError, AuthError};

/// Failures of the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Email has already been taken")]
    DuplicateEmail,
    #[error("Record not found")]
    NotFound,
    #[error("DATABASE_URL must be set for the postgres store backend")]
    MissingDatabaseUrl,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            other => AuthError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found(err),
            StoreError::DuplicateEmail => AuthError::DuplicateEmail.into(),
            other => AppError::internal(other),
        }
    }
}
