// crates/server/src/config.rs
//! Environment configuration.
//!
//! `.env` loading happens once in `main` (via dotenvy); this module only
//! reads the process environment. The core never sees configuration;
//! it receives constructed values.

use axum::http::HeaderValue;
use thiserror::Error;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Dev-frontend origin allowed when `ALLOW_ORIGINS` is unset.
pub const DEFAULT_ALLOW_ORIGIN: &str = "http://localhost:5173";

/// Per-call Gemini deadline when `GEMINI_TIMEOUT_SECS` is unset.
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("invalid GEMINI_TIMEOUT_SECS value: {0}")]
    InvalidTimeout(String),
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub port: u16,
    pub allow_origins: Vec<String>,
    pub gemini_timeout_secs: u64,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// `GEMINI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let port = match std::env::var("PORT").ok().filter(|p| !p.is_empty()) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let allow_origins = match std::env::var("ALLOW_ORIGINS").ok().filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => vec![DEFAULT_ALLOW_ORIGIN.to_string()],
        };

        let gemini_timeout_secs =
            match std::env::var("GEMINI_TIMEOUT_SECS").ok().filter(|s| !s.is_empty()) {
                Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidTimeout(raw))?,
                None => DEFAULT_GEMINI_TIMEOUT_SECS,
            };

        Ok(Self {
            gemini_api_key,
            port,
            allow_origins,
            gemini_timeout_secs,
        })
    }

    /// Allowed origins as header values for the CORS layer. Origins that
    /// are not valid header values are skipped with a warning.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        self.allow_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Skipping unparseable CORS origin");
                    None
                }
            })
            .collect()
    }
}
