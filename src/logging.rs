use std::env;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `LOG_LEVEL` (default `info`) sets the level.
/// Calling this twice is harmless: the second install is ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::default().add_directive(log_level.parse().unwrap_or(Level::INFO.into()))
    });

    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
