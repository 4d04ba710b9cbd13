//! TOML-based configuration for metadata resolution.
//!
//! Supports a config file (tablemeta.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [metadata]
//! default_kind = "schema_stats_only"
//!
//! [metadata.cache]
//! enabled = true
//! path = "${HOME}/.tablemeta/cache.db"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MetadataResult;
use crate::provider::ProviderKind;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Failed to determine cache directory")]
    NoCacheDir,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Metadata resolution configuration.
    pub metadata: MetadataSettings,
}

/// Metadata resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataSettings {
    /// Provider kind used when the planner does not ask for one:
    /// "schema_stats_only" or "full_discovery".
    pub default_kind: String,

    /// Persisted metadata cache.
    pub cache: CacheSettings,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            default_kind: ProviderKind::SchemaStatsOnly.as_str().to_string(),
            cache: CacheSettings::default(),
        }
    }
}

impl MetadataSettings {
    /// Parse the configured default kind.
    pub fn default_kind(&self) -> MetadataResult<ProviderKind> {
        self.default_kind.parse()
    }
}

/// Persisted metadata cache settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Enable the persisted cache.
    pub enabled: bool,

    /// Cache database path (supports ${ENV_VAR} expansion).
    /// Defaults to `~/.tablemeta/cache.db`.
    pub path: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl CacheSettings {
    /// Get the cache path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<PathBuf, SettingsError> {
        match &self.path {
            Some(path) => Ok(PathBuf::from(expand_env_vars(path)?)),
            None => {
                let base = dirs::home_dir().ok_or(SettingsError::NoCacheDir)?;
                Ok(base.join(".tablemeta").join("cache.db"))
            }
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `TABLEMETA_CONFIG`
    /// 2. `./tablemeta.toml`
    /// 3. `~/.config/tablemeta/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("TABLEMETA_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("tablemeta.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tablemeta").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name = if chars.next_if_eq(&'{').is_some() {
            let mut name = String::new();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                name.push(ch);
            }
            name
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
