use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directives when `RUST_LOG` is unset. `LOG_LEVEL` sets the level for
/// Rollcall's own crates.
pub(crate) fn default_filter(level: &str) -> String {
    format!(
        "rollcall={level},rollcall_db={level},rollcall_cli={level},rollcall_observability={level},tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn"
    )
}

/// Console-only logging, used when observability is disabled at compile time
/// or with `OBSERVABILITY_ENABLED=false`.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_filter(env_filter);

    if let Err(e) = tracing_subscriber::registry().with(console_layer).try_init() {
        eprintln!("Logging already initialized: {e}");
        return;
    }

    eprintln!("Observability disabled - console logging only");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let directives = default_filter("debug");
        assert!(directives.starts_with("rollcall=debug"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
