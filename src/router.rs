use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use rollcall_observability::{logging_middleware, metrics_middleware};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::middleware::rate_limit::{auth_rate_limit, general_rate_limit};
use crate::modules::dashboard::router::{
    init_dashboard_router, init_landing_router, init_whoami_router,
};
use crate::modules::registrations::router::init_registrations_router;
use crate::modules::sessions::router::{init_sessions_router, init_sign_in_router};
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let openapi = ApiDoc::openapi();

    Router::new()
        .merge(Scalar::with_url("/scalar", openapi.clone()))
        .route(
            "/api-docs/openapi.json",
            axum::routing::get(move || async move { axum::Json(openapi) }),
        )
        .merge(init_landing_router())
        .merge(
            init_sign_in_router()
                .merge(init_registrations_router())
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_rate_limit,
                )),
        )
        .merge(init_sessions_router())
        .merge(init_whoami_router(state.clone()))
        .merge(init_dashboard_router())
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            general_rate_limit,
        ))
        // Session-dependent responses must not be cached.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
