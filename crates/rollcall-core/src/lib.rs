//! # Rollcall Core
//!
//! Core types, errors, and utilities for the Rollcall API.
//!
//! This crate provides foundational types used throughout the Rollcall application:
//!
//! - [`errors`]: HTTP and domain error types with response conversion
//! - [`password`]: Password hashing and verification
//! - [`roles`]: The role discriminator shared by accounts and sessions
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::errors::{AppError, AuthError};
//! use rollcall_core::password::{hash_password, verify_password};
//! use rollcall_core::roles::Role;
//!
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//!
//! let redirect = AuthError::Unauthenticated { role: Role::Student };
//! ```

pub mod errors;
pub mod password;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError};
pub use password::{hash_password, hash_password_with_cost, verify_password};
pub use roles::Role;
