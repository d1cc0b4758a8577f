//! Configuration loading and data folder resolution

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Environment variable overriding the data folder location
pub const DATA_DIR_ENV: &str = "TASTE_DATA_DIR";

/// SQLite database file name inside the data folder
pub const DATABASE_FILE: &str = "taste.db";

/// Resolve the data folder, in priority order:
/// 1. Explicit caller argument (highest priority)
/// 2. `TASTE_DATA_DIR` environment variable
/// 3. `data_dir` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    // Priority 1: explicit caller argument
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&content) {
                if let Some(dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return PathBuf::from(dir);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Full path of the SQLite database inside the data folder
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}

/// Create the data folder if it does not exist yet
pub fn ensure_data_dir(data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    Ok(())
}

/// Locate the configuration file for the platform
fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/tastematch/config.toml first, then /etc/tastematch/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("tastematch").join("config.toml"));
        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/tastematch/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("tastematch").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tastematch"))
        .unwrap_or_else(|| PathBuf::from("./tastematch_data"))
}
