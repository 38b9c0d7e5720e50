//! Configuration loading and database path resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable consulted for the database path.
pub const DATABASE_ENV_VAR: &str = "LARDER_DATABASE";

const DATABASE_FILE_NAME: &str = "inventory.db";

/// Database path resolution priority order:
/// 1. Explicit argument (highest priority)
/// 2. `LARDER_DATABASE` environment variable
/// 3. `database_path` key in the TOML config file
/// 4. OS-dependent default data directory (fallback)
pub fn resolve_database_path(explicit: Option<&str>) -> PathBuf {
    // Priority 1: explicit argument from the hosting application
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(path) = config.get("database_path").and_then(|v| v.as_str()) {
                    return PathBuf::from(path);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir().join(DATABASE_FILE_NAME)
}

/// Get the configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/larder/config.toml first, then /etc/larder/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("larder").join("config.toml"));
        let system_config = PathBuf::from("/etc/larder/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("larder").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("larder"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/larder"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("larder"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/larder"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("larder"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\larder"))
    } else {
        PathBuf::from("./larder_data")
    }
}
