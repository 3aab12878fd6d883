//! Request-level middleware and extractors.
//!
//! - [`sessions`]: per-role session extractors ([`sessions::SignedIn`],
//!   [`sessions::ActiveSessions`], [`sessions::ScopeRole`])
//! - [`guard`]: role group guard for routes shared by several roles
//! - [`rate_limit`]: per-client request limits
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::sessions::{SignedIn, Teachers};
//!
//! // Redirects to /teachers/sign_in unless a teacher is signed in,
//! // whatever other roles the browser holds.
//! async fn my_subjects(SignedIn { account, .. }: SignedIn<Teachers>) -> impl IntoResponse {
//!     // ...
//! }
//! ```

pub mod guard;
pub mod rate_limit;
pub mod sessions;
