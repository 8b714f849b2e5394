use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "medcrew=info,medcrew_core=info";

/// `RUST_LOG` wins when set; otherwise agents and the server log at info.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
