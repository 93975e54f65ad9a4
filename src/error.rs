//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.
//! Every failure here is fatal: `main` prints the message to stderr and
//! exits with status 1.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// `Planning Center` API error with status context
    #[error("Planning Center API error: {message}")]
    Api {
        /// Human-readable error description, including the response body.
        message: String,
        /// HTTP status code, if from an HTTP response.
        status: Option<u16>,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Response body was not valid JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// No plan matched the after-date filter
    #[error("Plan lookup failed: {0}")]
    NoPlan(String),
}

impl Error {
    /// Create an API error with HTTP status
    pub fn api_status(message: impl Into<String>, status: u16) -> Self {
        let hint = match status {
            401 => Some("Check PLANNING_CENTER_APP_ID and PLANNING_CENTER_SECRET environment variables"),
            403 => Some("Your API credentials may lack required permissions"),
            404 => Some("The requested resource was not found"),
            429 => Some("Rate limited - wait a moment and try again"),
            500..=599 => Some("Planning Center server error - try again later"),
            _ => None,
        };
        Self::Api {
            message: message.into(),
            status: Some(status),
            hint,
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a decode error for a named request context
    pub fn decode(context: &str) -> Self {
        Self::Decode(format!("{context} response was not valid JSON"))
    }
}
