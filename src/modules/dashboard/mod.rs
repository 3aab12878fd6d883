//! Landing page, `/whoami` and the role-dispatched `/dashboard` routes.

pub mod controller;
pub mod router;
