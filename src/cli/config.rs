use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Optional tool configuration, read from
/// `$XDG_CONFIG_HOME/stowage/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default store directory, used when neither `-C` nor `STOWAGE_DIR`
    /// is given.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    /// Default to JSON output.
    #[serde(default)]
    pub json: bool,
}

/// Config file path, respecting XDG_CONFIG_HOME.
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    config_dir.join("stowage").join("config.toml")
}

/// Default store directory, respecting XDG_DATA_HOME.
pub fn default_store_dir() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"));
    data_dir.join("stowage")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config from a specific path. A missing file is an empty
/// config; a corrupt one warns and falls back to defaults.
pub fn read_config_from(path: &Path) -> CliConfig {
    if !path.exists() {
        return CliConfig::default();
    }
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("could not parse {}: {e}", path.display());
                CliConfig::default()
            }
        },
        Err(_) => CliConfig::default(),
    }
}

/// Read the config from the default location.
pub fn read_config() -> CliConfig {
    read_config_from(&config_path())
}

/// Pick the store directory: `-C` flag, then `STOWAGE_DIR`, then the
/// config file, then the XDG data default.
pub fn resolve_store_dir(
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    config: &CliConfig,
) -> PathBuf {
    flag.or(env)
        .or_else(|| config.store_dir.clone())
        .unwrap_or_else(default_store_dir)
}
