use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_tracing_with_level(level: &str) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
    {
        tracing::debug!(error = %e, "Log subscriber already installed; keeping it");
    }
}
