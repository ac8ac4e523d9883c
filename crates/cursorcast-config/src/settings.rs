//! Turn a validated config into the values the presence engine runs with.

use std::time::Duration;

use cursorcast_common::ConfigError;
use cursorcast_presence::{Liveness, LocalSession, RealtimeConfig, StreamSelector};

use crate::colors::normalize_color;
use crate::schema::CursorcastConfig;
use crate::validation;

/// Everything needed to start a presence session.
#[derive(Debug, Clone)]
pub struct PresenceSettings {
    pub session: LocalSession,
    pub stream: StreamSelector,
    pub liveness: Liveness,
    pub realtime: RealtimeConfig,
}

impl PresenceSettings {
    /// Validate `config` and build the engine settings from it.
    ///
    /// Empty participant id or color are generated fresh on every call.
    pub fn from_config(config: &CursorcastConfig) -> Result<Self, ConfigError> {
        validation::validate(config)?;

        let color = if config.session.color.is_empty() {
            None
        } else {
            Some(normalize_color(&config.session.color)?)
        };
        let session = LocalSession::from_parts(
            Some(config.session.participant_id.clone()),
            color,
            Duration::from_millis(u64::from(config.session.throttle_ms)),
        );

        let stream = if config.stream.signed_token.is_empty() {
            StreamSelector::Named(config.stream.name.clone())
        } else {
            StreamSelector::Signed(config.stream.signed_token.clone())
        };

        let liveness = Liveness {
            stale_threshold: Duration::from_millis(u64::from(config.liveness.stale_threshold_ms)),
            sweep_interval: Duration::from_millis(u64::from(config.liveness.sweep_interval_ms)),
        };

        let r = &config.realtime;
        let realtime = RealtimeConfig {
            project_ref: r.project_ref.clone(),
            api_key: r.api_key.clone(),
            endpoint: (!r.endpoint.is_empty()).then(|| r.endpoint.clone()),
            heartbeat_interval_secs: u64::from(r.heartbeat_interval),
            reconnect_delay_secs: u64::from(r.reconnect_delay),
            max_reconnect_delay_secs: u64::from(r.max_reconnect_delay),
            ..RealtimeConfig::default()
        };

        Ok(Self {
            session,
            stream,
            liveness,
            realtime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_generate_identity() {
        let settings = PresenceSettings::from_config(&CursorcastConfig::default()).unwrap();
        assert!(!settings.session.id().is_empty());
        assert!(settings.session.color.starts_with('#'));
        assert_eq!(settings.session.throttle, Duration::ZERO);
        assert_eq!(settings.stream, StreamSelector::Named("lobby".into()));
        assert_eq!(settings.liveness, Liveness::default());
        assert!(settings.realtime.endpoint.is_none());
    }

    #[test]
    fn generated_ids_differ_between_calls() {
        let config = CursorcastConfig::default();
        let a = PresenceSettings::from_config(&config).unwrap();
        let b = PresenceSettings::from_config(&config).unwrap();
        assert_ne!(a.session.id(), b.session.id());
    }

    #[test]
    fn explicit_values_are_used() {
        let mut config = CursorcastConfig::default();
        config.session.participant_id = "alice".into();
        config.session.color = "rgb(255,0,0)".into();
        config.session.throttle_ms = 50;
        config.stream.name.clear();
        config.stream.signed_token = "abc.def".into();
        config.liveness.stale_threshold_ms = 5000;
        config.liveness.sweep_interval_ms = 1000;
        config.realtime.endpoint = "ws://localhost:4000/socket".into();
        config.realtime.heartbeat_interval = 10;

        let settings = PresenceSettings::from_config(&config).unwrap();
        assert_eq!(settings.session.id(), "alice");
        assert_eq!(settings.session.color, "#ff0000");
        assert_eq!(settings.session.throttle, Duration::from_millis(50));
        assert_eq!(settings.stream, StreamSelector::Signed("abc.def".into()));
        assert_eq!(settings.liveness.stale_threshold, Duration::from_secs(5));
        assert_eq!(settings.liveness.sweep_interval, Duration::from_secs(1));
        assert_eq!(
            settings.realtime.endpoint.as_deref(),
            Some("ws://localhost:4000/socket")
        );
        assert_eq!(settings.realtime.heartbeat_interval_secs, 10);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = CursorcastConfig::default();
        config.session.throttle_ms = 5000;
        let err = PresenceSettings::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
