//! Translation of inbound Phoenix messages into realtime events.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::types::{PhoenixMessage, RealtimeEvent};

/// Strip the `realtime:` prefix Phoenix puts on channel topics.
pub(crate) fn strip_topic_prefix(topic: &str) -> &str {
    topic.strip_prefix("realtime:").unwrap_or(topic)
}

/// Outstanding `phx_join` refs, mapped to the short topic they join.
pub(crate) type PendingJoins = HashMap<String, String>;

/// Map one inbound Phoenix message to the event it represents, if any.
///
/// Only a reply whose `ref` matches an outstanding join counts as a join
/// result; replies to leaves and broadcast acks are ignored.
pub(crate) fn handle_phoenix_message(
    msg: &PhoenixMessage,
    pending: &mut PendingJoins,
) -> Option<RealtimeEvent> {
    let topic = strip_topic_prefix(&msg.topic);

    match msg.event.as_str() {
        // Heartbeat replies.
        "phx_reply" if topic == "phoenix" => None,
        "phx_reply" => {
            let status = msg.payload.get("status").and_then(|s| s.as_str())?;
            let joined = msg
                .msg_ref
                .as_ref()
                .and_then(|r| pending.remove(r))
                .is_some_and(|t| t == topic);
            match (joined, status) {
                (true, "ok") => {
                    debug!(topic = %topic, "Channel joined");
                    Some(RealtimeEvent::ChannelJoined {
                        topic: topic.to_string(),
                    })
                }
                (true, _) => {
                    let message = reply_reason(&msg.payload);
                    warn!(topic = %topic, status = %status, reason = %message, "Join rejected");
                    Some(RealtimeEvent::ChannelError {
                        topic: topic.to_string(),
                        message,
                    })
                }
                (false, "ok") => None,
                (false, _) => {
                    warn!(topic = %topic, status = %status, reason = %reply_reason(&msg.payload), "Request failed");
                    None
                }
            }
        }
        "phx_error" => {
            warn!(topic = %topic, "Channel error");
            Some(RealtimeEvent::ChannelClosed {
                topic: topic.to_string(),
                reason: "Channel error".to_string(),
            })
        }
        "phx_close" => {
            info!(topic = %topic, "Channel closed");
            Some(RealtimeEvent::ChannelClosed {
                topic: topic.to_string(),
                reason: "Channel closed".to_string(),
            })
        }
        "broadcast" => {
            let inner_event = msg
                .payload
                .get("event")
                .and_then(|e| e.as_str())
                .unwrap_or("unknown")
                .to_string();
            let inner_payload = msg
                .payload
                .get("payload")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            debug!(topic = %topic, event = %inner_event, "Broadcast received");
            Some(RealtimeEvent::Broadcast {
                topic: topic.to_string(),
                event: inner_event,
                payload: inner_payload,
            })
        }
        _ => {
            debug!(topic = %topic, event = %msg.event, "Unhandled Phoenix event");
            None
        }
    }
}

fn reply_reason(payload: &serde_json::Value) -> String {
    payload
        .get("response")
        .and_then(|r| r.get("reason"))
        .and_then(|r| r.as_str())
        .unwrap_or("unknown error")
        .to_string()
}
