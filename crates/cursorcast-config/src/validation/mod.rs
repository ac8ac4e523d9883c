//! Full configuration validation.
//!
//! Each section has its own validator; [`validate`] runs them all and
//! collects every problem into a single `ConfigError`.

mod helpers;
mod session;
mod timing;


use crate::schema::CursorcastConfig;
use cursorcast_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CursorcastConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    session::validate_session(&mut errors, config);
    session::validate_stream(&mut errors, config);
    timing::validate_liveness(&mut errors, config);
    timing::validate_realtime(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
