//! # Rollcall Config
//!
//! Configuration types for the Rollcall API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`session`]: Session token signing and lifetime
//! - [`groups`]: Role groups and their priority order
//! - [`store`]: Persistence backend selection
//! - [`server`]: Listen addresses
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`rate_limit`]: API rate limiting configuration
//!
//! # Example
//!
//! ```ignore
//! use rollcall_config::{SessionConfig, RoleGroupsConfig, StoreConfig};
//!
//! let session_config = SessionConfig::from_env();
//! let groups = RoleGroupsConfig::from_env()?;
//! let store_config = StoreConfig::from_env();
//! ```

pub mod cors;
pub mod groups;
pub mod rate_limit;
pub mod server;
pub mod session;
pub mod store;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use groups::{RoleGroupSpec, RoleGroupsConfig, RoleGroupsParseError};
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use session::{MAX_SESSION_TTL_SECS, SessionConfig};
pub use store::{StoreBackend, StoreConfig};
