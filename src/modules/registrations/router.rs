use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::sign_up;

pub fn init_registrations_router() -> Router<AppState> {
    Router::new().route("/{scope}/sign_up", post(sign_up))
}
