//! Per-role sign-in, sign-out and session lookup.

pub mod controller;
pub mod router;
pub mod service;
