use cursorcast_common::ConfigError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

/// Environment variable that replaces the platform config directory.
pub const CONFIG_DIR_ENV: &str = "CURSORCAST_CONFIG_DIR";

/// `$CURSORCAST_CONFIG_DIR/config.toml`, or `cursorcast/config.toml` under
/// the platform config directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir).join("config.toml"));
    }
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("cursorcast").join("config.toml"))
}

/// Write the commented default config to `path`. Never overwrites.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut f| f.write_all(default_config_toml().as_bytes()))
        .map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to write default config to {}: {e}",
                path.display()
            ))
        })?;

    info!("created default config at {}", path.display());
    Ok(())
}
