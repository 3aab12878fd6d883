use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

use super::controller::{current_session, sign_in, sign_in_form, sign_out};

/// Sign-in routes. Kept apart so the credential rate limit can wrap them.
pub fn init_sign_in_router() -> Router<AppState> {
    Router::new().route("/{scope}/sign_in", get(sign_in_form).post(sign_in))
}

pub fn init_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/{scope}/sign_out", delete(sign_out))
        .route("/{scope}/session", get(current_session))
}
