//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// Some, but not all, of the fields a section needs are set.
    #[error(
        "Configuration section '{section}' is incomplete: missing {}",
        missing.join(", ")
    )]
    ConfigurationIncomplete {
        section: String,
        missing: Vec<String>,
    },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

