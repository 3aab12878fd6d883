pub mod dashboard;
pub mod registrations;
pub mod sessions;
pub mod subjects;

pub use self::sessions::service::{SessionAuthenticator, SignedInSession};
