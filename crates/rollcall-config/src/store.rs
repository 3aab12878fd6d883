use std::env;

/// Persistence backend for accounts, sessions and subjects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local maps; data is lost on restart.
    Memory,
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Postgres,
            database_url: None,
            max_connections: 10,
            password_hash_cost: 12,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: match env::var("STORE_BACKEND").map(|v| v.to_lowercase()) {
                Ok(v) if v == "memory" => StoreBackend::Memory,
                _ => defaults.backend,
            },
            database_url: env::var("DATABASE_URL").ok(),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_connections),
            password_hash_cost: env::var("PASSWORD_HASH_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|cost| (4..=31).contains(cost))
                .unwrap_or(defaults.password_hash_cost),
        }
    }

    /// In-memory configuration with the cheapest bcrypt cost, for tests and demos.
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            password_hash_cost: 4,
            ..Self::default()
        }
    }
}
