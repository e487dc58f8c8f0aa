use crate::marker::DEFAULT_ENTRY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Folder name written to `~/.hidden`
    #[serde(default = "default_entry_name")]
    pub entry_name: String,

    /// Parent of the hidden folder; the home directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

fn default_entry_name() -> String {
    DEFAULT_ENTRY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_name: default_entry_name(),
            base_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    /// If the config file doesn't exist, create it with default values
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            log::info!("Config file not found, creating default config at {:?}", config_path);
            let default_config = Config::default();
            default_config.save_to(config_path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        log::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .context("Failed to write config file")?;

        log::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;
        Ok(config_dir.join("hidemark").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_created_with_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("hidemark").join("config.toml");

        let config = Config::load_from(&path)?;

        assert_eq!(config, Config::default());
        assert_eq!(config.entry_name, "Encrypted");
        assert!(path.exists());

        Ok(())
    }

    #[test]
    fn test_saved_config_loads_back() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        let config = Config {
            entry_name: "Vault".to_string(),
            base_dir: Some(PathBuf::from("/data")),
        };

        config.save_to(&path)?;
        assert_eq!(Config::load_from(&path)?, config);

        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "base_dir = \"/srv\"\n")?;

        let config = Config::load_from(&path)?;
        assert_eq!(config.entry_name, "Encrypted");
        assert_eq!(config.base_dir, Some(PathBuf::from("/srv")));

        Ok(())
    }

    #[test]
    fn test_malformed_config_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "entry_name = [")?;

        assert!(Config::load_from(&path).is_err());

        Ok(())
    }
}
