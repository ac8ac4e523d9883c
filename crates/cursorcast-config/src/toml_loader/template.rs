/// Default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Cursorcast configuration
# Schema version 1
# Only override what you want to change. Missing fields use defaults.

[session]
# participant_id = ""    # empty: random per session; [A-Za-z0-9_-], max 64
# color = ""             # empty: random; #rgb, #rrggbb, #rrggbbaa, rgb(), rgba()
# throttle_ms = 0        # 0-1000, 0 sends every move

[stream]
# Set exactly one of these.
name = "lobby"
# signed_token = ""

[liveness]
# stale_threshold_ms = 2000  # 250-60000
# sweep_interval_ms = 500    # 50-10000, not above stale_threshold_ms

[realtime]
# project_ref = ""
# api_key = ""
# endpoint = ""              # ws:// or wss:// URL of a self-hosted server
# heartbeat_interval = 25    # 5-300 seconds
# reconnect_delay = 1
# max_reconnect_delay = 30

[logging]
# level = "info"             # trace, debug, info, warn, error
"##
    .to_string()
}
