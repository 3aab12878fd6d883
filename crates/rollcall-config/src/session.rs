use std::env;

/// Longest accepted session lifetime (ten years).
pub const MAX_SESSION_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Session signing and lifetime settings.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// HMAC secret for session tokens.
    pub secret: String,
    /// Session lifetime in seconds, within `0..=MAX_SESSION_TTL_SECS`.
    pub ttl_secs: i64,
    /// Mark session cookies `Secure` (HTTPS only).
    pub cookie_secure: bool,
    /// How often expired sessions are purged, in seconds.
    pub purge_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: "your-secret-key-change-in-production".to_string(),
            ttl_secs: 86400, // 1 day
            cookie_secure: false,
            purge_interval_secs: 300,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: env::var("SESSION_SECRET").unwrap_or(defaults.secret),
            ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| parse_ttl(&s))
                .unwrap_or(defaults.ttl_secs),
            cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.cookie_secure),
            purge_interval_secs: env::var("SESSION_PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.purge_interval_secs),
        }
    }
}

fn parse_ttl(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .map(|secs| secs.clamp(0, MAX_SESSION_TTL_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_is_clamped() {
        assert_eq!(parse_ttl(&i64::MAX.to_string()), Some(MAX_SESSION_TTL_SECS));
        assert_eq!(parse_ttl("-30"), Some(0));
        assert_eq!(parse_ttl(" 3600 "), Some(3600));
        assert_eq!(parse_ttl("a day"), None);
    }
}
