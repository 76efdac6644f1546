use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::error::ConfigurationError;
use crate::pack::Level;

/// Environment variable holding the generation backend base URL.
pub const BACKEND_URL_ENV: &str = "PREPPILOT_BACKEND_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub backend_url: Option<String>,
    pub default_level: Option<Level>,
    pub export_dir: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Load the config file, then let `.env` and the process environment
    /// override the backend URL.
    pub fn load_with_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::load().unwrap_or_else(|err| {
            tracing::warn!("ignoring unreadable config file: {err}");
            Self::new()
        });
        config.apply_env(std::env::var(BACKEND_URL_ENV).ok());
        config
    }

    pub fn apply_env(&mut self, backend_url: Option<String>) {
        if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
            self.backend_url = Some(url);
        }
    }

    /// The configured base URL without trailing slashes.
    pub fn backend_url(&self) -> Result<String, ConfigurationError> {
        self.backend_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .ok_or(ConfigurationError::MissingBackendUrl)
    }

    pub fn level(&self) -> Level {
        self.default_level.unwrap_or_default()
    }

    /// Where exported PDFs go: the configured directory or the working directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("preppilot").join("config.json"))
    }
}
