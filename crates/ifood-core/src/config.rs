//! Configuration management for the iFood CLI.
//!
//! Loads configuration from ${IFOOD_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// The `{{DEVICE_ID}}` placeholder is filled in by [`Config::init`].
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for iFood configuration and data files.
    //!
    //! IFOOD_HOME resolution order:
    //! 1. IFOOD_HOME environment variable (if set)
    //! 2. ~/.config/ifood (default)

    use std::path::PathBuf;

    /// Returns the iFood home directory.
    ///
    /// Checks IFOOD_HOME env var first, falls back to ~/.config/ifood
    /// (or `./.ifood` when no home directory can be determined).
    pub fn ifood_home() -> PathBuf {
        if let Ok(home) = std::env::var("IFOOD_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".ifood"),
            |h| h.join(".config").join("ifood"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        ifood_home().join("config.toml")
    }

    /// Returns the path to the saved credentials.
    pub fn credentials_path() -> PathBuf {
        ifood_home().join("credentials.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        ifood_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Marketplace API root (env `IFOOD_BASE_URL` wins)
    pub base_url: Option<String>,
    pub tenant_id: String,
    pub device_id: String,
    pub channel: String,
    pub home_alias: String,
    pub home_page_size: u32,
    pub accept_language: String,
    pub platform: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            tenant_id: Self::DEFAULT_TENANT_ID.to_string(),
            device_id: Self::DEFAULT_DEVICE_ID.to_string(),
            channel: Self::DEFAULT_CHANNEL.to_string(),
            home_alias: Self::DEFAULT_HOME_ALIAS.to_string(),
            home_page_size: 100,
            accept_language: "pt-BR,pt".to_string(),
            platform: "Desktop".to_string(),
        }
    }
}

impl Config {
    pub const DEFAULT_TENANT_ID: &'static str = "IFO";
    pub const DEFAULT_DEVICE_ID: &'static str = "17a538bb-d063-4fd6-a613-74bc9465e09c";
    pub const DEFAULT_CHANNEL: &'static str = "IFOOD";
    pub const DEFAULT_HOME_ALIAS: &'static str = "single_tab_cms";

    /// Loads configuration from the default path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the commented default template to `path` with a fresh device id.
    ///
    /// # Errors
    /// Fails if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let device_id = uuid::Uuid::new_v4().to_string();
        let contents = default_config_template().replace("{{DEVICE_ID}}", &device_id);
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
