//! Rate limiting configuration for API endpoints.
//!
//! Limits are expressed as [`governor`] quotas: a token bucket refilled at
//! `per_second` tokens per second holding at most `burst_size` tokens.
//! Credential endpoints (sign-in, sign-up) get their own, stricter bucket to
//! slow down password guessing.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: Set to `false` to disable limiting (default: true)
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: Requests per second for general endpoints (default: 2)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: Burst size for general endpoints (default: 30)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: Requests per second for credential endpoints (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: Burst size for credential endpoints (default: 5)

use std::num::NonZeroU32;

use governor::Quota;

/// Rate limit configuration for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Requests per second for general endpoints.
    pub general_per_second: u32,

    /// Burst size for general endpoints.
    pub general_burst_size: u32,

    /// Requests per second for credential endpoints.
    pub auth_per_second: u32,

    /// Burst size for credential endpoints.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general_per_second: 2,
            general_burst_size: 30,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Falls back to defaults for unset or unparsable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            general_per_second: std::env::var("RATE_LIMIT_GENERAL_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.general_per_second),
            general_burst_size: std::env::var("RATE_LIMIT_GENERAL_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.general_burst_size),
            auth_per_second: std::env::var("RATE_LIMIT_AUTH_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_per_second),
            auth_burst_size: std::env::var("RATE_LIMIT_AUTH_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_burst_size),
        }
    }

    /// Configuration with limiting switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Quota for general API endpoints.
    #[must_use]
    pub fn general_quota(&self) -> Quota {
        quota(self.general_per_second, self.general_burst_size)
    }

    /// Quota for credential endpoints.
    #[must_use]
    pub fn auth_quota(&self) -> Quota {
        quota(self.auth_per_second, self.auth_burst_size)
    }
}

// Zero values are clamped to one so a misconfiguration never blocks every request.
fn quota(per_second: u32, burst_size: u32) -> Quota {
    let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst_size).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(rate).allow_burst(burst)
}
