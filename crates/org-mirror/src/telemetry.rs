use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostics filter (e.g. `debug`, `github_backend=trace`)
pub const LOG_FILTER_ENV: &str = "ORG_MIRROR_LOG";

/// Send `tracing` diagnostics to stderr; quiet unless `ORG_MIRROR_LOG` asks for more
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
