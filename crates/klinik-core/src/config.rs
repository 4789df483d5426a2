//! Client configuration.
//!
//! Precedence, lowest first: built-in defaults, the config file, `KLINIK_*`
//! environment variables.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://klinik.aloycantik.xyz/api";
pub const DEFAULT_STORAGE_PATH: &str = "klinik-storage.sqlite3";
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Looked up as `klinik.toml` in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "klinik";
pub const ENV_PREFIX: &str = "KLINIK";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// API origin including the `/api` prefix
    pub base_url: String,
    /// Local storage file (holds the session token)
    pub storage_path: PathBuf,
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration. An explicit `path` must exist; the default file may not.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("storage_path", DEFAULT_STORAGE_PATH)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?;

        builder = match path {
            Some(p) => builder.add_source(File::from(p)),
            None => builder.add_source(File::new(DEFAULT_CONFIG_NAME, FileFormat::Toml).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
