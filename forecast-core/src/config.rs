use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::transport::OpenWeatherTransport;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Override of the provider base URL, mostly useful against a mock server.
    pub base_url: Option<String>,

    /// Request timeout; no timeout is applied when absent.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolved_api_key(&self) -> Option<String> {
        Self::key_from(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    fn key_from(env: Option<String>, stored: Option<&str>) -> Option<String> {
        env.filter(|k| !k.trim().is_empty())
            .or_else(|| stored.map(str::to_owned))
            .filter(|k| !k.trim().is_empty())
    }

    /// Build the HTTP transport described by this config.
    pub fn transport(&self) -> Result<OpenWeatherTransport> {
        let api_key = self.resolved_api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `forecast configure` or set {API_KEY_ENV}."
            )
        })?;

        let mut transport = OpenWeatherTransport::new(api_key);
        if let Some(base_url) = &self.base_url {
            transport = transport.with_base_url(base_url.as_str());
        }
        if let Some(secs) = self.timeout_secs {
            transport = transport
                .with_timeout(Duration::from_secs(secs))
                .context("Failed to build HTTP client")?;
        }

        Ok(transport)
    }
}
