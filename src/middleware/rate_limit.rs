//! Per-client rate limiting with [`governor`].
//!
//! Clients are keyed by the first `X-Forwarded-For` address, then the peer
//! address, then a shared `unknown` bucket. Credential endpoints draw from a
//! separate, stricter bucket.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, RateLimiter};
use rollcall_config::RateLimitConfig;
use rollcall_core::AppError;

use crate::state::AppState;

type KeyedLimiter = DefaultKeyedRateLimiter<String>;

#[derive(Clone)]
pub struct RateLimiters {
    general: Arc<KeyedLimiter>,
    auth: Arc<KeyedLimiter>,
}

impl fmt::Debug for RateLimiters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiters")
            .field("general_keys", &self.general.len())
            .field("auth_keys", &self.auth.len())
            .finish()
    }
}

impl RateLimiters {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            general: Arc::new(RateLimiter::keyed(config.general_quota())),
            auth: Arc::new(RateLimiter::keyed(config.auth_quota())),
        }
    }

    /// Drops state for clients whose buckets have refilled.
    pub fn retain_recent(&self) {
        self.general.retain_recent();
        self.auth.retain_recent();
    }
}

pub(crate) fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn check(limiter: &KeyedLimiter, req: &Request) -> Result<(), AppError> {
    let key = client_key(req);
    limiter.check_key(&key).map_err(|_| {
        tracing::warn!(client = %key, path = %req.uri().path(), "Rate limit exceeded");
        AppError::too_many_requests("Too many requests, please try again later.".to_string())
    })
}

pub async fn general_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.rate_limit_config.enabled {
        check(&state.rate_limiters.general, &req)?;
    }
    Ok(next.run(req).await)
}

/// Stricter limit for sign-in and sign-up.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.rate_limit_config.enabled {
        check(&state.rate_limiters.auth, &req)?;
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(forwarded: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_client_key_prefers_forwarded_for() {
        assert_eq!(client_key(&request(Some("10.0.0.1, 10.0.0.2"))), "10.0.0.1");
    }

    #[test]
    fn test_client_key_uses_peer_address() {
        let mut req = request(None);
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_key(&req), "127.0.0.1");
    }

    #[test]
    fn test_client_key_falls_back_to_unknown() {
        assert_eq!(client_key(&request(None)), "unknown");
    }

    #[test]
    fn test_limiter_rejects_past_burst() {
        let config = RateLimitConfig {
            auth_per_second: 1,
            auth_burst_size: 2,
            ..RateLimitConfig::default()
        };
        let limiters = RateLimiters::new(&config);
        let req = request(Some("10.0.0.9"));

        assert!(check(&limiters.auth, &req).is_ok());
        assert!(check(&limiters.auth, &req).is_ok());
        let err = check(&limiters.auth, &req).unwrap_err();
        assert_eq!(err.status.as_u16(), 429);

        // Other clients have their own bucket.
        assert!(check(&limiters.auth, &request(Some("10.0.0.10"))).is_ok());
    }
}
