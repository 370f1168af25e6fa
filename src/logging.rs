use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PHOTO_EDITOR_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Installs the global tracing subscriber. Later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
