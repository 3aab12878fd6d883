//! # Rollcall DB
//!
//! Persistence for the Rollcall API.
//!
//! Every table sits behind a repository trait with two implementations:
//! PostgreSQL through SQLx, and process-local maps for tests and demos. The
//! backend is picked by [`StoreConfig`]; callers only see [`Store`].
//!
//! # Example
//!
//! ```ignore
//! use rollcall_config::StoreConfig;
//! use rollcall_db::Store;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Store::connect(&StoreConfig::from_env()).await?;
//!     let account = store.accounts.create("a@x.com", "pw1", "Ada", Role::Student).await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use rollcall_config::{StoreBackend, StoreConfig};
use sqlx::postgres::PgPoolOptions;

pub mod accounts;
pub mod error;
pub mod sessions;
pub mod subjects;

pub use accounts::{AccountRepository, AccountStore, MemoryAccountRepository, PgAccountRepository};
pub use error::StoreError;
pub use sessions::{MemorySessionRepository, PgSessionRepository, SessionRepository};
pub use subjects::{MemorySubjectRepository, PgSubjectRepository, SubjectRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Initializes a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns [`StoreError::MissingDatabaseUrl`] when no URL is configured and
/// [`StoreError::Database`] when the connection fails.
pub async fn init_db_pool(config: &StoreConfig) -> Result<PgPool, StoreError> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or(StoreError::MissingDatabaseUrl)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the SQL migrations shipped in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// All repositories of one backend.
#[derive(Debug, Clone)]
pub struct Store {
    pub accounts: AccountStore,
    pub sessions: Arc<dyn SessionRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
}

impl Store {
    /// Process-local store. Data is lost when the process exits.
    pub fn memory(password_hash_cost: u32) -> Self {
        Self {
            accounts: AccountStore::new(
                Arc::new(MemoryAccountRepository::new()),
                password_hash_cost,
            ),
            sessions: Arc::new(MemorySessionRepository::new()),
            subjects: Arc::new(MemorySubjectRepository::new()),
        }
    }

    pub fn postgres(pool: PgPool, password_hash_cost: u32) -> Self {
        Self {
            accounts: AccountStore::new(
                Arc::new(PgAccountRepository::new(pool.clone())),
                password_hash_cost,
            ),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            subjects: Arc::new(PgSubjectRepository::new(pool)),
        }
    }

    /// Builds the configured backend. Postgres connects and runs migrations
    /// first.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory store; data will not survive a restart");
                Ok(Self::memory(config.password_hash_cost))
            }
            StoreBackend::Postgres => {
                let pool = init_db_pool(config).await?;
                run_migrations(&pool).await?;
                tracing::info!("Database connected and migrations applied");
                Ok(Self::postgres(pool, config.password_hash_cost))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let store = Store::connect(&StoreConfig::memory()).await.unwrap();
        assert!(store.subjects.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_postgres_without_url_fails() {
        let config = StoreConfig {
            database_url: None,
            ..StoreConfig::default()
        };
        assert!(matches!(
            Store::connect(&config).await,
            Err(StoreError::MissingDatabaseUrl)
        ));
    }
}
