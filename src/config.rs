//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\mixset\config.toml
//! - macOS: ~/Library/Application Support/mixset/config.toml
//! - Linux: ~/.config/mixset/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded at
//! startup; every value has a default so a missing or partial file works.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External API settings
    pub annotation: AnnotationConfig,

    /// Library and set-folder settings
    pub library: LibraryConfig,
}

/// Remote annotation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Contact string for the MusicBrainz User-Agent (the API asks every
    /// consumer to identify itself, usually with an email address)
    pub contact: Option<String>,
}

/// Library management settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Working database path (relative paths resolve from the cwd)
    pub database: PathBuf,

    /// Default destination for organized set folders
    pub set_folder: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(crate::db::DEFAULT_DB_NAME),
            set_folder: PathBuf::from("mixset_ordered"),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mixset"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[annotation]"));
        assert!(toml.contains("[library]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.annotation.contact = Some("dj@example.com".to_string());
        config.library.set_folder = PathBuf::from("/music/sets/friday");

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(
            parsed.annotation.contact,
            Some("dj@example.com".to_string())
        );
        assert_eq!(parsed.library.set_folder, PathBuf::from("/music/sets/friday"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[annotation]
contact = "dj@example.com"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.annotation.contact, Some("dj@example.com".to_string()));
        assert_eq!(config.library.database, PathBuf::from("mixset.db"));
        assert_eq!(config.library.set_folder, PathBuf::from("mixset_ordered"));
    }
}
