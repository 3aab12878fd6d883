use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

pub use crate::logging::is_observability_enabled;

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `None` when observability is disabled or a recorder cannot be
/// installed (for example, one is already installed).
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5,
                10.0,
            ],
        )
        .and_then(|builder| builder.install_recorder());

    let handle = match handle {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed; metrics disabled");
            return None;
        }
    };

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Domain metrics

pub fn track_account_created(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("accounts_created_total", "role" => role.to_string()).increment(1);
}

pub fn track_sign_in_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sign_ins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_sign_in_failure(role: &str, reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sign_ins_total", "role" => role.to_string(), "status" => "failure", "reason" => reason.to_string()).increment(1);
}

pub fn track_sign_out(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sign_outs_total", "role" => role.to_string()).increment(1);
}

/// A session cookie that was present but not honoured (expired, revoked,
/// forged, or issued for another role).
pub fn track_session_rejected(role: &str, reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sessions_rejected_total", "role" => role.to_string(), "reason" => reason.to_string()).increment(1);
}

/// An unauthenticated request sent to a role's sign-in page by a guard.
pub fn track_guard_redirect(group: &str, role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("guard_redirects_total", "group" => group.to_string(), "role" => role.to_string()).increment(1);
}

pub fn track_sessions_purged(count: u64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sessions_purged_total").increment(count);
}
