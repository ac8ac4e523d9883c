//! Cursorcast configuration.
//!
//! TOML-based configuration with full validation. All sections use
//! defaults so partial configs work out of the box.
//!
//! ```rust,no_run
//! use cursorcast_config::{load_config, PresenceSettings};
//!
//! let config = load_config(None).expect("failed to load config");
//! let settings = PresenceSettings::from_config(&config).expect("invalid config");
//! println!("joining {}", settings.stream);
//! ```

pub mod colors;
pub mod schema;
pub mod settings;
pub mod toml_loader;
pub mod validation;

pub use schema::{CursorcastConfig, LogLevel, CONFIG_SCHEMA_VERSION};
pub use settings::PresenceSettings;

use cursorcast_common::ConfigError;
use std::path::Path;

/// Load config from `path`, or from the platform default path (creating
/// it if missing) when `path` is `None`. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<CursorcastConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &CursorcastConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
