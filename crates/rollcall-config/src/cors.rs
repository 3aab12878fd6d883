use std::env;

/// Origins allowed to make credentialed (cookie-carrying) requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::parse("http://localhost:3000,http://localhost:5173")
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        env::var("ALLOWED_ORIGINS")
            .map(|origins| Self::parse(&origins))
            .unwrap_or_default()
    }

    pub fn parse(origins: &str) -> Self {
        let allowed_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_skips_empty() {
        let config = CorsConfig::parse(" https://a.test , ,https://b.test");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn test_default_allows_local_frontends() {
        assert_eq!(CorsConfig::default().allowed_origins.len(), 2);
    }
}
