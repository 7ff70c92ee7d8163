//! Typed runtime configuration.
//!
//! Values come from a TOML document or from `WORKFLOOR_*` environment
//! variables. Every field has a default, so an empty source is valid.

use serde::Deserialize;
use std::env;
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_VAR: &str = "WORKFLOOR_LOG";
/// Environment variable switching JSON log output on or off.
pub const JSON_LOGS_VAR: &str = "WORKFLOOR_JSON_LOGS";
/// Environment variable holding the cancellation note prefix.
pub const CANCEL_NOTE_PREFIX_VAR: &str = "WORKFLOOR_CANCEL_NOTE_PREFIX";

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_CANCEL_NOTE_PREFIX: &str = "Cancelled: ";

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A boolean variable held something other than a boolean.
    #[error("environment variable {name} must be a boolean, got '{value}'")]
    InvalidFlag {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The TOML document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Runtime configuration for the registry, the lifecycle engine, and logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkfloorConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
    /// Text written before the reason when a cancellation is noted.
    pub cancel_note_prefix: String,
}

impl Default for WorkfloorConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            json_logs: false,
            cancel_note_prefix: DEFAULT_CANCEL_NOTE_PREFIX.to_owned(),
        }
    }
}

impl WorkfloorConfig {
    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed documents or unknown keys.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// Reads configuration from `WORKFLOOR_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFlag`] when [`JSON_LOGS_VAR`] is not a
    /// boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            log_filter: env::var(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
            json_logs: match env::var(JSON_LOGS_VAR) {
                Ok(value) => parse_flag(JSON_LOGS_VAR, &value)?,
                Err(_) => defaults.json_logs,
            },
            cancel_note_prefix: env::var(CANCEL_NOTE_PREFIX_VAR)
                .unwrap_or(defaults.cancel_note_prefix),
        })
    }

    /// Loads a `.env` file when present, then reads the environment.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_env_with_dotenv() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            debug!(error = %err, "no .env file loaded");
        }
        Self::from_env()
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_owned(),
        }),
    }
}
