//! Configuration management for the KAM lead tracker
//!
//! Settings are layered from:
//! - `config/default.{yaml,toml,json}`
//! - `config/{env}.{yaml,toml,json}`
//! - Environment variables (`KAM_LEADS_` prefix, `__` between sections)

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, ObservabilityConfig, PersistenceConfig, RankingConfig, RuntimeEnvironment,
    SchedulingConfig, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(path) => ConfigError::FileNotFound(path),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}
