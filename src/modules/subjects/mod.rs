//! Subjects taught by teachers and the students enrolled in them.

pub mod controller;
pub mod router;
pub mod service;
