//! Configuration module.
//!
//! Handles the config file, environment variable expansion and defaults.

mod settings;

pub use settings::{expand_env_vars, CacheSettings, MetadataSettings, Settings, SettingsError};
