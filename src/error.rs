//! Error types for lanyard-sim.
//!
//! The numerical core never fails; only configuration loading and
//! validation return errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is out of range.
    #[error("invalid config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Reading or writing a config file failed.
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Config JSON could not be parsed or produced.
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
