use std::env;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::ScalableError;

pub const INJECT_KEY_PATH_VAR: &str = "SCALABLE_INJECT_KEY_PATH";
pub const ENTITY_KEY_PATH_VAR: &str = "SCALABLE_ENTITY_KEY_PATH";
pub const LOADING_KEY_PATH_VAR: &str = "SCALABLE_LOADING_KEY_PATH";

/// Where each built-in slice is mounted inside the host state tree.
///
/// Paths are dot-separated (`"app.inject"`). An empty string means the slice
/// is the root state itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyPathConfig {
    #[serde(default)]
    pub inject: String,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub loading: String,
}

/// Configuration for the fragment families and the loading tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub key_paths: KeyPathConfig,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    /// Unset variables leave the slice at the root path.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Layer environment variables on top of an already loaded config.
    pub fn with_env_overrides(self) -> Self {
        dotenvy::dotenv().ok();
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Keys are the `SCALABLE_*`
    /// variable names.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(INJECT_KEY_PATH_VAR) {
            self.key_paths.inject = path;
        }
        if let Some(path) = lookup(ENTITY_KEY_PATH_VAR) {
            self.key_paths.entity = path;
        }
        if let Some(path) = lookup(LOADING_KEY_PATH_VAR) {
            self.key_paths.loading = path;
        }
        self
    }

    pub fn log_summary(&self) {
        info!(
            inject = display_path(&self.key_paths.inject),
            entity = display_path(&self.key_paths.entity),
            loading = display_path(&self.key_paths.loading),
            "Slice key paths configured"
        );
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<Config, ScalableError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScalableError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ScalableError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse config from TOML text.
pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}
