//! Configuration management for TubeDeck

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::youtube::DEFAULT_THUMBNAIL_QUALITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Thumbnail variant used for newly added videos (e.g. "mqdefault", "hqdefault")
    #[serde(default = "default_thumbnail_quality")]
    pub thumbnail_quality: String,
}

fn default_thumbnail_quality() -> String {
    DEFAULT_THUMBNAIL_QUALITY.to_string()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            thumbnail_quality: default_thumbnail_quality(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file yields [`Config::default_config`].
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default_config());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content)
            .map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig {
                path: "~/.local/share/tubedeck/playlists.db".to_string(),
            },
            player: PlayerConfig::default(),
        }
    }
}

/// Resolve the configuration file path (`$TUBEDECK_CONFIG` or the platform config dir)
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("TUBEDECK_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("tubedeck").join("config.toml"))
}
