//! Tracing subscriber initialisation.
//!
//! The library itself only emits `tracing` events. Embedding applications
//! call [`init_tracing`] once at startup to print them.

use crate::config::WorkfloorConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors returned while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        /// Rejected directive.
        directive: String,
        /// Parser failure.
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Builds the event filter: `RUST_LOG` wins over the configured directive.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `RUST_LOG` is unset and the
/// configured directive is malformed.
pub fn env_filter(config: &WorkfloorConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_filter).map_err(|source| TelemetryError::InvalidFilter {
        directive: config.log_filter.clone(),
        source,
    })
}

/// Installs a global fmt subscriber configured from `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a malformed filter or
/// [`TelemetryError::Install`] when a global subscriber already exists.
pub fn init_tracing(config: &WorkfloorConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| TelemetryError::Install(err.to_string()))
}
