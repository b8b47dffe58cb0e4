use apogee_references::{DisplayCatalog, DisplayInfoOverride};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory icons and other static assets are served from
    pub resource_root: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_types: Vec<DisplayInfoOverride>,
}

impl Config {
    pub fn new(resource_root: impl Into<PathBuf>) -> Self {
        Self {
            resource_root: resource_root.into(),
            reference_types: Vec::new(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(&content, config_path).map(Some)
    }

    fn parse(content: &str, config_path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.resource_root = Self::expand_path(&config.resource_root).unwrap_or(config.resource_root);
        Ok(config)
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/apogee");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Built-in reference display info with this config's overrides applied
    pub fn display_catalog(&self) -> DisplayCatalog {
        let mut catalog = DisplayCatalog::builtin();
        catalog.apply_overrides(&self.reference_types);
        catalog
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
