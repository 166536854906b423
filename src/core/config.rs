//! Configuration file handling and resolved runtime settings.
//!
//! The config file is optional TOML under the platform config directory.
//! Precedence for every knob is CLI flag, then config file, then built-in
//! default. Chat state is never written here; the file only carries
//! preferences.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_model: Option<String>,
    pub base_url: Option<String>,
    pub theme: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    /// Load the config file if one exists; a missing file (or a platform
    /// without a config dir) is the default configuration, not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn config_path() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "kaiwa")?;
        Some(proj_dirs.config_dir().join("config.toml"))
    }
}

/// The fully resolved knobs the rest of the program runs with.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub base_url: String,
    pub theme: Option<String>,
    pub timeout: Duration,
}

impl Settings {
    pub fn resolve(
        config: &Config,
        model: Option<&str>,
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Self {
        let model = model
            .map(str::to_string)
            .or_else(|| config.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = timeout_secs
            .or(config.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            model,
            base_url,
            theme: config.theme.clone(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_default() {
        let dir = tempdir().expect("tempdir");
        let config =
            Config::load_from_path(&dir.path().join("config.toml")).expect("load default");
        assert!(config.default_model.is_none());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "default_model = \"local-model\"\nbase_url = \"http://localhost:8080/v1\"\ntimeout_secs = 10\n",
        )
        .expect("write config");

        let config = Config::load_from_path(&path).expect("load config");
        assert_eq!(config.default_model.as_deref(), Some("local-model"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_model = [broken").expect("write config");

        let err = Config::load_from_path(&path).expect_err("parse error");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn flags_override_config_which_overrides_defaults() {
        let config = Config {
            default_model: Some("config-model".to_string()),
            base_url: Some("http://config.example/v1".to_string()),
            theme: Some("light".to_string()),
            timeout_secs: Some(30),
        };

        let settings = Settings::resolve(&config, Some("flag-model"), None, Some(5));
        assert_eq!(settings.model, "flag-model");
        assert_eq!(settings.base_url, "http://config.example/v1");
        assert_eq!(settings.theme.as_deref(), Some("light"));
        assert_eq!(settings.timeout, Duration::from_secs(5));

        let defaults = Settings::resolve(&Config::default(), None, None, None);
        assert_eq!(defaults.model, DEFAULT_MODEL);
        assert_eq!(defaults.base_url, DEFAULT_BASE_URL);
        assert_eq!(defaults.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
