//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// A caller-supplied value is out of range or malformed. Never clamped.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

impl SlotError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SlotError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
