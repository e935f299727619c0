use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Env var naming the config file; falls back to `config.toml`.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
/// Env var overriding `storage.data_file`.
pub const DATA_FILE_ENV: &str = "COIN_MANAGER_FILE";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_data_file() -> PathBuf { PathBuf::from("data.json") }

/// Load from `$CONFIG_PATH`, or `config.toml` when unset.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

impl AppConfig {
    /// Load the given file, or the default location when `path` is `None`.
    ///
    /// A missing default file yields the built-in defaults; an explicitly named file must
    /// exist.
    pub fn load_and_validate(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => load_from_file(p)?,
            None => match std::env::var(CONFIG_PATH_ENV) {
                Ok(p) => load_from_file(p)?,
                Err(_) if !Path::new("config.toml").exists() => AppConfig::default(),
                Err(_) => load_default()?,
            },
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(file) = std::env::var(DATA_FILE_ENV) {
            if !file.trim().is_empty() {
                self.data_file = PathBuf::from(file);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_file is empty"));
        }
        if self.data_file.file_name().is_none() {
            return Err(anyhow!(
                "storage.data_file must name a file: {}",
                self.data_file.display()
            ));
        }
        Ok(())
    }
}
