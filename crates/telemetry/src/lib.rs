//! Logging bootstrap for the bookshelf service.
//!
//! Installs the global tracing subscriber once at startup. The filter comes
//! from `RUST_LOG` when set, otherwise defaults to `info`. Output format is
//! chosen by [`TelemetrySettings::log_format`]: human-readable for local
//! development, JSON lines for deployed environments.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the global tracing subscriber.
///
/// Fails if a subscriber is already installed, so call it exactly once from
/// `main`.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|err| anyhow::anyhow!(err))
            .context("failed to install tracing subscriber")?,
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .try_init()
            .map_err(|err| anyhow::anyhow!(err))
            .context("failed to install tracing subscriber")?,
    }

    tracing::info!(format = ?settings.log_format, "telemetry initialized");

    Ok(())
}
