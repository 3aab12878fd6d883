//! # Rollcall CLI
//!
//! Account administration and seeding utilities behind the `rollcall-cli`
//! binary.
//!
//! ```ignore
//! use rollcall_cli::seeder::{SeedConfig, seed_all};
//!
//! let store = Store::connect(&StoreConfig::from_env()).await?;
//! seed_all(&store, &SeedConfig::default()).await?;
//! ```

pub mod seeder;

use chrono::Utc;
use rollcall_core::{AuthError, Role};
use rollcall_db::{Store, StoreError};
use rollcall_models::Account;

/// Creates an account for `role`, with the same rules as sign-up.
pub async fn create_account(
    store: &Store,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
) -> Result<Account, AuthError> {
    store.accounts.create(email, password, name, role).await
}

/// Deletes expired sessions of every role. Returns how many were removed.
pub async fn purge_sessions(store: &Store) -> Result<u64, StoreError> {
    store.sessions.purge_expired(Utc::now()).await
}
