use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `debug` or `bo_io=trace`.
pub const LOG_ENV: &str = "BREW_OFFLOAD_LOG";

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
