//! Error types for transfer-alerts
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Corrupt state files are not represented here: the state store recovers
//! from them locally and never hands them to a caller.

use thiserror::Error;

/// The main error type for transfer-alerts
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Transfer source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Unexpected data from source: {message}")]
    UnexpectedData { message: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },
}

impl Error {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a source unavailable error
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
        }
    }

    /// Create an unexpected data error
    pub fn unexpected_data(message: impl Into<String>) -> Self {
        Self::UnexpectedData {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Check if this error is transient (the next poll cycle may succeed)
    ///
    /// Anything else points at bad data or a local fault that retrying
    /// will not fix on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_) | Error::SourceUnavailable { .. })
    }

    /// Check if this error should abort startup
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::MissingConfigField { .. } | Error::InvalidConfigValue { .. }
        )
    }
}

/// Result type alias for transfer-alerts
pub type Result<T> = std::result::Result<T, Error>;
