//! Error types for the clicker.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClickerError {
    /// A form field failed validation before starting the click loop.
    #[error("invalid {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    /// Fixed-position clicking was requested before a position was picked.
    #[error("no fixed position picked yet")]
    MissingFixedPosition,

    #[error("failed to load settings from '{path}': {reason}")]
    SettingsLoad { path: String, reason: String },

    #[error("failed to save settings to '{path}': {reason}")]
    SettingsSave { path: String, reason: String },

    /// A persisted hotkey name that no known key maps to.
    #[error("unknown key name '{0}'")]
    UnknownKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClickerError>;

impl ClickerError {
    pub fn invalid_setting(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field,
            reason: reason.into(),
        }
    }
}
