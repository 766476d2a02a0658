//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when neither RUST_LOG nor config set one.
pub const DEFAULT_FILTER: &str = "hedera_starter=info";

/// Build the filter: `RUST_LOG` wins, then `level` from config.
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) if !level.trim().is_empty() => {
            EnvFilter::try_new(format!("hedera_starter={}", level.trim()))
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        _ => EnvFilter::new(DEFAULT_FILTER),
    })
}

/// Install the global subscriber. Writes to stderr so stdout stays readable.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(level: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
