//! # Rollcall Models
//!
//! Domain models and DTOs for the Rollcall API.
//!
//! This crate provides the data structures shared by the store, the HTTP layer
//! and the CLI, including database entities, request/response DTOs, and
//! validation rules.
//!
//! # Modules
//!
//! - [`accounts`]: Accounts shared by every role
//! - [`auth`]: Sign-in, sign-up and session DTOs
//! - [`sessions`]: Server-side session records
//! - [`subjects`]: Subjects taught by teachers and student enrollments
//!
//! # Example
//!
//! ```ignore
//! use rollcall_models::accounts::{Account, AccountResponse};
//! use rollcall_models::auth::SignInRequest;
//!
//! let response = AccountResponse::from(account);
//! ```

pub mod accounts;
pub mod auth;
pub mod sessions;
pub mod subjects;

// Re-export commonly used types at crate root for convenience
pub use accounts::{Account, AccountResponse, NewAccount, SignUpRequest, normalize_email};
pub use auth::{
    DashboardResponse, MessageResponse, SessionClaims, SessionResponse, SignInForm,
    SignInRequest, SignInResponse, WhoAmIResponse,
};
pub use sessions::Session;
pub use subjects::{
    CreateSubjectRequest, EnrollRequest, Enrollment, Subject, SubjectListResponse,
};
