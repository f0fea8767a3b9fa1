use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Backend origin used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Backend origin, e.g. "http://localhost:5000".
    pub base_url: Option<String>,

    /// Directory holding the recent-search history.
    /// Defaults to the platform data directory.
    pub history_dir: Option<PathBuf>,
}

impl Config {
    /// Configured backend origin, or [`DEFAULT_BASE_URL`].
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Validate and store the backend origin.
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        let parsed = reqwest::Url::parse(url).with_context(|| {
            format!("Invalid backend URL '{url}'.\nHint: use a full origin such as {DEFAULT_BASE_URL}")
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Unsupported URL scheme '{}' in '{url}'. Only http and https are supported.",
                parsed.scheme()
            ));
        }

        self.base_url = Some(url.trim_end_matches('/').to_string());
        Ok(())
    }

    /// Directory for the history store: configured override or platform default.
    pub fn history_dir(&self) -> Result<PathBuf> {
        match &self.history_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
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

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}
