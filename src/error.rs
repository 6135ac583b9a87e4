use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChronolabelError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error(
        "LEAKAGE DETECTED: column '{column}' has a value at {timestamp}, before source start {source_start}"
    )]
    Leakage {
        column: String,
        timestamp: DateTime<Utc>,
        source_start: DateTime<Utc>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ChronolabelError>;
