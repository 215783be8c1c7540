use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{defaults, envvars};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Settings for the REST client helper
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout = match env::var(envvars::HTTP_TIMEOUT_SECS) {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout {
                    var: envvars::HTTP_TIMEOUT_SECS,
                    value,
                })?,
            Err(_) => defaults::API_REQUEST_TIMEOUT,
        };
        Ok(Self { timeout })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: defaults::API_REQUEST_TIMEOUT,
        }
    }
}
