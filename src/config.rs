//! Application configuration.
//!
//! Handles loading API credentials from environment variables and .env
//! files. Loading is strict: both credentials must be present before any
//! request is attempted.

use dotenv::dotenv;
use std::env;

use crate::error::{Error, Result};

/// Environment variable holding the `Planning Center` application ID.
pub const APP_ID_ENV: &str = "PLANNING_CENTER_APP_ID";

/// Environment variable holding the `Planning Center` secret.
pub const SECRET_ENV: &str = "PLANNING_CENTER_SECRET";

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// `Planning Center` Online application ID
    pub pco_app_id: String,
    /// `Planning Center` Online secret
    pub pco_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails with a [`Error::Config`] naming every missing variable if
    /// either credential is unset or empty.
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let pco_app_id = env::var(APP_ID_ENV).unwrap_or_default();
        let pco_secret = env::var(SECRET_ENV).unwrap_or_default();

        let mut missing = Vec::new();
        if pco_app_id.is_empty() {
            missing.push(APP_ID_ENV);
        }
        if pco_secret.is_empty() {
            missing.push(SECRET_ENV);
        }
        if !missing.is_empty() {
            return Err(Error::config(
                format!("Missing required environment variables: {}", missing.join(", ")),
                "Set them in the environment or a .env file",
            ));
        }

        Ok(Self { pco_app_id, pco_secret })
    }
}
