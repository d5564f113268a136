use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the gateway.
///
/// Loaded once at startup and passed by reference into the components that
/// need it; there is no process-global configuration state.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the RAG backend the gateway proxies to.
    pub backend_url: String,
    /// Per-call timeout applied to backend HTTP requests, in seconds.
    pub backend_timeout_secs: u64,
    /// Origins allowed by CORS; empty means permissive.
    pub allowed_origins: Vec<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Default backend call timeout when `BACKEND_TIMEOUT_SECS` is unset.
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 120;

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: load_env("RAG_BACKEND_URL")?,
            backend_timeout_secs: load_env_optional("BACKEND_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("BACKEND_TIMEOUT_SECS".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECS),
            allowed_origins: load_env_optional("ALLOWED_ORIGINS")
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
