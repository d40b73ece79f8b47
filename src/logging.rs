//! Logging initialization.
//!
//! Logs go to stderr so the report on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over the command-line level.

use crate::cli::LogFormat;
use eyre::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// Must be called once, before any tracing macros are used.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize text tracing subscriber: {}", e))?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize JSON tracing subscriber: {}", e))?,
    }

    Ok(())
}
