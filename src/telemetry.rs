//! Structured logging set-up.

use crate::settings::LoggingSettings;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directives do not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Builds the event filter. `RUST_LOG` wins over the configured directives.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured directives are
/// malformed.
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .map_err(TelemetryError::from)
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is malformed or a subscriber
/// is already installed.
pub fn init(settings: &LoggingSettings) -> Result<(), TelemetryError> {
    let json_layer = settings
        .json
        .then(|| fmt::layer().json().with_current_span(true).with_span_list(true));
    let text_layer = (!settings.json).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter(settings)?)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    tracing::info!(json = settings.json, "telemetry initialised");
    Ok(())
}
