//! # Rollcall Auth
//!
//! Session tokens and role groups for the Rollcall API.
//!
//! This crate provides:
//!
//! - [`claims`]: Claims carried by a role's session cookie
//! - [`jwt`]: Session token creation and verification
//! - [`groups`]: Named, ordered role groups used by route guards
//!
//! Each role signs in independently and gets its own cookie. A token is only
//! honoured under the cookie of the role it was issued for.
//!
//! # Example
//!
//! ```ignore
//! use rollcall_auth::{SessionClaims, create_session_token, verify_session_token_for};
//! use rollcall_config::SessionConfig;
//! use rollcall_core::Role;
//!
//! let config = SessionConfig::from_env();
//! let claims = SessionClaims::new(session_id, account_id, "a@x.com", Role::Student, now, expires_at);
//! let token = create_session_token(&claims, &config)?;
//!
//! let claims = verify_session_token_for(&token, Role::Student, &config)?;
//! ```

pub mod claims;
pub mod groups;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::SessionClaims;
pub use groups::{DEFAULT_GROUP, RoleGroup, RoleGroupError, RoleGroups};
pub use jwt::{create_session_token, verify_session_token, verify_session_token_for};
