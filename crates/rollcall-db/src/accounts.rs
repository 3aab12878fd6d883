//! Account storage.
//!
//! [`AccountRepository`] is the raw table; [`AccountStore`] adds email
//! normalization, password hashing and credential checks on top of it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rollcall_core::{AppError, AuthError, Role, hash_password_with_cost, verify_password};
use rollcall_models::{Account, NewAccount, normalize_email};
use sqlx::PgPool;
use tokio::sync::{OnceCell, RwLock};
use tracing::instrument;
use uuid::Uuid;

use crate::error::StoreError;

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, name, role, created_at";

// Hashed once per store and verified against when an email is unknown.
const DECOY_PASSWORD: &str = "rollcall-decoy-password";

#[async_trait]
pub trait AccountRepository: Send + Sync + fmt::Debug {
    /// Inserts the account. Emails are unique across every role; the check and
    /// the insert happen atomically.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Looks up by normalized email, whatever the role.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Deletes every account whose email ends in `@domain`. Returns the count.
    async fn delete_by_email_domain(&self, domain: &str) -> Result<u64, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (email, password_hash, name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(account.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateEmail;
            }
            StoreError::from(e)
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let account =
            sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(account)
    }

    async fn delete_by_email_domain(&self, domain: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE lower(email) LIKE $1 ESCAPE '\\'")
            .bind(email_domain_pattern(domain))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// `LIKE` pattern matching emails at exactly `domain`.
fn email_domain_pattern(domain: &str) -> String {
    let mut pattern = String::from("%@");
    for c in domain.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern
}

/// Process-local accounts. The write lock serializes uniqueness checks.
#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;

        let email = normalize_email(&account.email);
        if accounts.values().any(|existing| existing.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let account = Account {
            id: Uuid::new_v4(),
            email,
            password_hash: account.password_hash,
            name: account.name,
            role: account.role,
            created_at: Utc::now(),
        };
        accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let email = normalize_email(email);
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn delete_by_email_domain(&self, domain: &str) -> Result<u64, StoreError> {
        let suffix = format!("@{}", domain.to_lowercase());
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|_, a| !a.email.ends_with(&suffix));
        Ok((before - accounts.len()) as u64)
    }
}

/// Accounts shared by every role.
///
/// bcrypt runs on the blocking pool so hashing never stalls the runtime.
#[derive(Clone)]
pub struct AccountStore {
    repo: Arc<dyn AccountRepository>,
    hash_cost: u32,
    decoy_hash: Arc<OnceCell<String>>,
}

impl fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountStore")
            .field("repo", &self.repo)
            .field("hash_cost", &self.hash_cost)
            .finish_non_exhaustive()
    }
}

impl AccountStore {
    pub fn new(repo: Arc<dyn AccountRepository>, hash_cost: u32) -> Self {
        Self {
            repo,
            hash_cost,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Creates an account with a fixed role.
    ///
    /// # Errors
    ///
    /// [`AuthError::DuplicateEmail`] if any account, of any role, already uses
    /// the email.
    #[instrument(skip(self, password), fields(role = %role))]
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<Account, AuthError> {
        let email = normalize_email(email);

        // Skip the hash for the common duplicate case; the insert still decides.
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hash(password).await?;
        let account = self
            .repo
            .insert(NewAccount {
                email,
                password_hash,
                name: name.trim().to_string(),
                role,
            })
            .await?;

        tracing::info!(account_id = %account.id, role = %account.role, "Account created");
        Ok(account)
    }

    /// The account with this email, if it exists and has `role`.
    pub async fn find_by_email_and_role(
        &self,
        email: &str,
        role: Role,
    ) -> Result<Account, StoreError> {
        self.repo
            .find_by_email(&normalize_email(email))
            .await?
            .filter(|account| account.role == role)
            .ok_or(StoreError::NotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Account, StoreError> {
        self.repo.find_by_id(id).await?.ok_or(StoreError::NotFound)
    }

    /// Checks `password` against the account's bcrypt hash.
    pub async fn verify_credential(
        &self,
        account: &Account,
        password: &str,
    ) -> Result<bool, AuthError> {
        verify_blocking(password.to_string(), account.password_hash.clone()).await
    }

    /// Resolves the account for a sign-in attempt as `role`.
    ///
    /// Unknown emails, wrong passwords and accounts of another role all fail
    /// the same way. Unknown emails still pay for one bcrypt verification.
    #[instrument(skip(self, password), fields(role = %role))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, AuthError> {
        let account = match self.find_by_email_and_role(email, role).await {
            Ok(account) => account,
            Err(StoreError::NotFound) => {
                self.verify_decoy(password).await?;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.verify_credential(&account, password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Inserts an account whose password is already hashed. Used for bulk
    /// seeding, where one hash is shared by many accounts.
    pub async fn insert_hashed(&self, account: NewAccount) -> Result<Account, StoreError> {
        self.repo
            .insert(NewAccount {
                email: normalize_email(&account.email),
                ..account
            })
            .await
    }

    pub fn hash_cost(&self) -> u32 {
        self.hash_cost
    }

    pub async fn delete_by_email_domain(&self, domain: &str) -> Result<u64, StoreError> {
        self.repo.delete_by_email_domain(domain).await
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        hash_blocking(password.to_string(), self.hash_cost).await
    }

    async fn verify_decoy(&self, password: &str) -> Result<(), AuthError> {
        let cost = self.hash_cost;
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| hash_blocking(DECOY_PASSWORD.to_string(), cost))
            .await?;
        verify_blocking(password.to_string(), decoy.clone()).await?;
        Ok(())
    }
}

async fn hash_blocking(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password_with_cost(&password, cost))
        .await
        .map_err(|e| AuthError::Internal(anyhow::anyhow!("Password hashing task failed: {e}")))?
        .map_err(app_to_auth)
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(anyhow::anyhow!("Password verification task failed: {e}")))?
        .map_err(app_to_auth)
}

fn app_to_auth(err: AppError) -> AuthError {
    AuthError::Internal(err.error)
}
