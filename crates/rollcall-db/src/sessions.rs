//! Server-side session records.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_models::Session;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

#[async_trait]
pub trait SessionRepository: Send + Sync + fmt::Debug {
    async fn insert(&self, session: &Session) -> Result<(), StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    /// Removes the session. Returns whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Removes every session expired at `now`. Returns the count.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sessions (id, account_id, role, issued_at, expires_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(session.id)
        .bind(session.account_id)
        .bind(session.role.as_str())
        .bind(session.issued_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, account_id, role, issued_at, expires_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn insert(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rollcall_core::Role;

    #[tokio::test]
    async fn test_insert_find_delete() {
        let repo = MemorySessionRepository::new();
        let session = Session::new(Uuid::new_v4(), Role::Student, Utc::now(), 3600);

        repo.insert(&session).await.unwrap();
        assert_eq!(repo.find(session.id).await.unwrap(), Some(session.clone()));

        assert!(repo.delete(session.id).await.unwrap());
        assert!(!repo.delete(session.id).await.unwrap());
        assert_eq!(repo.find(session.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_sessions() {
        let repo = MemorySessionRepository::new();
        let now = Utc::now();
        let live = Session::new(Uuid::new_v4(), Role::Teacher, now, 3600);
        let stale = Session::new(Uuid::new_v4(), Role::Student, now - Duration::hours(2), 60);

        repo.insert(&live).await.unwrap();
        repo.insert(&stale).await.unwrap();

        assert_eq!(repo.purge_expired(now).await.unwrap(), 1);
        assert!(repo.find(live.id).await.unwrap().is_some());
        assert!(repo.find(stale.id).await.unwrap().is_none());
    }

    async fn insert_account(pool: &PgPool, email: &str, role: Role) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO accounts (email, password_hash, name, role)
             VALUES ($1, 'not-a-real-hash', 'Test', $2)
             RETURNING id",
        )
        .bind(email)
        .bind(role.as_str())
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_pg_insert_find_delete(pool: PgPool) {
        let account_id = insert_account(&pool, "a@x.com", Role::Student).await;
        let repo = PgSessionRepository::new(pool);
        let session = Session::new(account_id, Role::Student, Utc::now(), 3600);

        repo.insert(&session).await.unwrap();
        let found = repo.find(session.id).await.unwrap().unwrap();
        assert_eq!(found.account_id, account_id);
        assert_eq!(found.role, Role::Student);
        assert!(!found.is_expired(Utc::now()));

        assert!(repo.delete(session.id).await.unwrap());
        assert!(!repo.delete(session.id).await.unwrap());
        assert!(repo.find(session.id).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_pg_purge_expired_keeps_live_sessions(pool: PgPool) {
        let student = insert_account(&pool, "a@x.com", Role::Student).await;
        let teacher = insert_account(&pool, "b@x.com", Role::Teacher).await;
        let repo = PgSessionRepository::new(pool);
        let now = Utc::now();
        let live = Session::new(teacher, Role::Teacher, now, 3600);
        let stale = Session::new(student, Role::Student, now - Duration::hours(2), 60);

        repo.insert(&live).await.unwrap();
        repo.insert(&stale).await.unwrap();

        assert_eq!(repo.purge_expired(now).await.unwrap(), 1);
        assert!(repo.find(live.id).await.unwrap().is_some());
        assert!(repo.find(stale.id).await.unwrap().is_none());
        assert_eq!(repo.purge_expired(now).await.unwrap(), 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_pg_sessions_go_with_their_account(pool: PgPool) {
        let account_id = insert_account(&pool, "a@x.com", Role::Teacher).await;
        let repo = PgSessionRepository::new(pool.clone());
        let session = Session::new(account_id, Role::Teacher, Utc::now(), 3600);
        repo.insert(&session).await.unwrap();

        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(repo.find(session.id).await.unwrap().is_none());
    }
}
