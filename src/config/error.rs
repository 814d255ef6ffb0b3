use std::path::PathBuf;
use thiserror::Error;

/// Problems that make a configuration unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not specified")]
    MissingApiKey,

    #[error("station is not specified")]
    MissingStation,

    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse accessory configuration")]
    Parse(#[from] serde_json::Error),
}

/// Recoverable configuration problems. Each one falls back to a default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigWarning {
    #[error("Unsupported sensor '{0}' specified, defaulting to air quality")]
    UnsupportedSensor(String),

    #[error("Unsupported option '{0}' specified for polling, defaulting to false")]
    UnsupportedPolling(String),

    #[error("interval is not specified, defaulting to {0} minutes")]
    MissingInterval(u64),

    #[error("Unsupported interval '{value}' specified, defaulting to {default} minutes")]
    UnsupportedInterval { value: String, default: u64 },
}
