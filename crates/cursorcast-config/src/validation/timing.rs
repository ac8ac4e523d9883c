use super::helpers::validate_range;
use crate::schema::CursorcastConfig;

pub(super) fn validate_liveness(errors: &mut Vec<String>, config: &CursorcastConfig) {
    let l = &config.liveness;
    validate_range(errors, "liveness.stale_threshold_ms", l.stale_threshold_ms, 250, 60_000);
    validate_range(errors, "liveness.sweep_interval_ms", l.sweep_interval_ms, 50, 10_000);
    if l.sweep_interval_ms > l.stale_threshold_ms {
        errors.push(format!(
            "liveness.sweep_interval_ms = {} exceeds stale_threshold_ms = {}",
            l.sweep_interval_ms, l.stale_threshold_ms
        ));
    }
}

pub(super) fn validate_realtime(errors: &mut Vec<String>, config: &CursorcastConfig) {
    let r = &config.realtime;
    validate_range(errors, "realtime.heartbeat_interval", r.heartbeat_interval, 5, 300);
    validate_range(errors, "realtime.reconnect_delay", r.reconnect_delay, 1, 60);
    validate_range(errors, "realtime.max_reconnect_delay", r.max_reconnect_delay, 1, 600);
    if r.reconnect_delay > r.max_reconnect_delay {
        errors.push(format!(
            "realtime.reconnect_delay = {} exceeds max_reconnect_delay = {}",
            r.reconnect_delay, r.max_reconnect_delay
        ));
    }
    if !r.endpoint.is_empty()
        && !(r.endpoint.starts_with("ws://") || r.endpoint.starts_with("wss://"))
    {
        errors.push(format!(
            "realtime.endpoint = {:?} must be a ws:// or wss:// URL",
            r.endpoint
        ));
    }
}
