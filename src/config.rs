use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub blocklist: BlocklistConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token of a moderator account.
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlocklistConfig {
    /// Newline- or comma-separated domains (or URLs, the hostname is taken).
    #[serde(default)]
    pub sources: String,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default = "default_concurrent_sources")]
    pub concurrent_sources: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Defaults
fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}
fn default_interval_seconds() -> u64 {
    3600
}
fn default_concurrent_sources() -> usize {
    4
}
fn default_ledger_path() -> String {
    "origin-guard-ledger.json".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        toml::from_str("").unwrap()
    }
}
impl Default for BlocklistConfig {
    fn default() -> Self {
        toml::from_str("").unwrap()
    }
}
impl Default for StorageConfig {
    fn default() -> Self {
        toml::from_str("").unwrap()
    }
}
impl Default for LoggingConfig {
    fn default() -> Self {
        toml::from_str("").unwrap()
    }
}
impl Default for Config {
    fn default() -> Self {
        toml::from_str("").unwrap()
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
