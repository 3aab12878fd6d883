//! Rollcall Observability Module
//!
//! Provides configurable observability features including:
//! - Tracing and distributed tracing via OpenTelemetry
//! - Metrics collection via Prometheus
//! - HTTP request/response logging
//!
//! This module can be enabled or disabled at compile time via the `observability` feature flag.
//! At runtime, observability can be further controlled via the `OBSERVABILITY_ENABLED` environment variable.
//!
//! # Features
//!
//! - `observability` (default): Enables all observability features including tracing, logging, and metrics
//!
//! # Examples
//!
//! ```no_run
//! use rollcall_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

/// Handle passed to [`metrics_app`] to render the exposition.
#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle as MetricsHandle;

#[cfg(feature = "observability")]
pub use crate::logging::{
    REQUEST_ID_HEADER, init_tracing, is_observability_enabled, logging_middleware, shutdown_tracer,
};
#[cfg(feature = "observability")]
pub use crate::metrics::{
    init_metrics, metrics_app, metrics_middleware, track_account_created, track_guard_redirect,
    track_session_rejected, track_sessions_purged, track_sign_in_failure, track_sign_in_success,
    track_sign_out,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    pub type MetricsHandle = ();

    pub const REQUEST_ID_HEADER: &str = "x-request-id";

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Console logging only.
    pub fn init_tracing() {
        crate::basic_logging::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<MetricsHandle> {
        None
    }

    pub fn metrics_app(_handle: MetricsHandle) -> Router {
        Router::new()
    }

    pub fn track_account_created(_role: &str) {}
    pub fn track_sign_in_success(_role: &str) {}
    pub fn track_sign_in_failure(_role: &str, _reason: &str) {}
    pub fn track_sign_out(_role: &str) {}
    pub fn track_session_rejected(_role: &str, _reason: &str) {}
    pub fn track_guard_redirect(_group: &str, _role: &str) {}
    pub fn track_sessions_purged(_count: u64) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
