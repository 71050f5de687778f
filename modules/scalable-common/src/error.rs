use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScalableError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error("Async runtime unavailable: {0}")]
    Runtime(String),
}
