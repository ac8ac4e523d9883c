//! Read a config from a path or the platform default.

use crate::schema::CursorcastConfig;
use crate::validation;
use cursorcast_common::ConfigError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their defaults. Validation problems are logged but
/// do not fail the load; [`PresenceSettings::from_config`] rejects them.
///
/// [`PresenceSettings::from_config`]: crate::PresenceSettings::from_config
pub fn load_from_path(path: &Path) -> Result<CursorcastConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("failed to read {}: {e}", path.display())),
    })?;

    let config: CursorcastConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform default path, writing a commented
/// default file first if none exists.
///
/// On Linux this is `~/.config/cursorcast/config.toml`.
pub fn load_default() -> Result<CursorcastConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(CursorcastConfig::default())
        }
        Err(e) => Err(e),
    }
}
