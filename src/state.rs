use std::sync::Arc;

use rollcall_auth::RoleGroups;
use rollcall_config::{CorsConfig, RateLimitConfig, RoleGroupsConfig, SessionConfig, StoreConfig};
use rollcall_core::Role;
use rollcall_db::Store;

use crate::middleware::rate_limit::RateLimiters;
use crate::modules::sessions::service::SessionAuthenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Store,
    pub session_config: SessionConfig,
    /// Loaded once at startup; read on every guarded or dispatched request.
    pub role_groups: Arc<RoleGroups>,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub rate_limiters: RateLimiters,
}

impl AppState {
    pub fn new(
        store: Store,
        session_config: SessionConfig,
        role_groups: RoleGroups,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        let rate_limiters = RateLimiters::new(&rate_limit_config);
        Self {
            store,
            session_config,
            role_groups: Arc::new(role_groups),
            cors_config,
            rate_limit_config,
            rate_limiters,
        }
    }

    /// The session authenticator for one role's scope.
    pub fn authenticator(&self, role: Role) -> SessionAuthenticator {
        SessionAuthenticator::new(role, &self.store, self.session_config.clone())
    }
}

/// Builds state from the environment, connecting to the configured store.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let store = Store::connect(&StoreConfig::from_env()).await?;
    let role_groups = RoleGroups::from_config(&RoleGroupsConfig::from_env()?)?;

    Ok(AppState::new(
        store,
        SessionConfig::from_env(),
        role_groups,
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
    ))
}
