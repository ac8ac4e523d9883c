//! Wire types for cursor presence.
//!
//! A presence message is the application payload that rides inside a
//! transport broadcast. Inbound envelopes are validated here, at the
//! boundary; nothing past this point sees an unchecked payload.

use cursorcast_common::ProtocolError;
use serde::{Deserialize, Serialize};

/// Event names carried in the `event` field.
pub mod events {
    pub const MOVE: &str = "move";
}

const MAX_ID_LEN: usize = 64;
const MAX_COLOR_LEN: usize = 64;
const MAX_PATH_LEN: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Move,
}

/// Where a pointer is: an element address plus an offset inside that
/// element's bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub x: f64,
    pub y: f64,
}

/// `{ "event": "move", "id", "color", "location": { "path", "x", "y" } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceMessage {
    pub event: MessageKind,
    pub id: String,
    pub color: String,
    pub location: Location,
}

impl PresenceMessage {
    pub fn moved(id: impl Into<String>, color: impl Into<String>, location: Location) -> Self {
        Self {
            event: MessageKind::Move,
            id: id.into(),
            color: color.into(),
            location,
        }
    }

    /// Parse and validate an inbound envelope.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProtocolError> {
        match value.get("event") {
            Some(serde_json::Value::String(event)) if event != events::MOVE => {
                return Err(ProtocolError::UnsupportedEvent(event.clone()));
            }
            _ => {}
        }
        let message: Self = serde_json::from_value(value)
            .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        message.validate()?;
        Ok(message)
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.id.is_empty() || self.id.len() > MAX_ID_LEN {
            return Err(invalid("id", format!("length must be 1-{MAX_ID_LEN}")));
        }
        if self.id.chars().any(char::is_control) {
            return Err(invalid("id", "contains control characters"));
        }
        if self.color.is_empty() || self.color.len() > MAX_COLOR_LEN {
            return Err(invalid("color", format!("length must be 1-{MAX_COLOR_LEN}")));
        }
        if !self.color.chars().all(is_css_color_char) {
            return Err(invalid("color", "not a CSS color value"));
        }
        if self.location.path.is_empty() || self.location.path.len() > MAX_PATH_LEN {
            return Err(invalid(
                "location.path",
                format!("length must be 1-{MAX_PATH_LEN}"),
            ));
        }
        if !self.location.x.is_finite() {
            return Err(invalid("location.x", "not finite"));
        }
        if !self.location.y.is_finite() {
            return Err(invalid("location.y", "not finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ProtocolError {
    ProtocolError::InvalidField {
        field,
        reason: reason.into(),
    }
}

/// Characters that can appear in hex, `rgb()`, `hsl()`, `oklch()` or named
/// colors, and nothing that could break out of a style attribute.
fn is_css_color_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '#' | '%' | '.' | ',' | '(' | ')' | ' ' | '-' | '/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> serde_json::Value {
        json!({
            "event": "move",
            "id": "alice",
            "color": "#ff8800",
            "location": { "path": "html>body>div[2]", "x": 4.5, "y": 10.0 }
        })
    }

    #[test]
    fn serializes_to_wire_shape() {
        let msg = PresenceMessage::moved(
            "alice",
            "#ff8800",
            Location {
                path: "html>body>div[2]".into(),
                x: 4.5,
                y: 10.0,
            },
        );
        assert_eq!(msg.to_value(), valid());
    }

    #[test]
    fn parses_valid_envelope() {
        let msg = PresenceMessage::from_value(valid()).unwrap();
        assert_eq!(msg.event, MessageKind::Move);
        assert_eq!(msg.id, "alice");
        assert_eq!(msg.location.path, "html>body>div[2]");
        assert_eq!(msg.location.x, 4.5);
    }

    #[test]
    fn integer_offsets_are_accepted() {
        let mut value = valid();
        value["location"]["x"] = json!(3);
        let msg = PresenceMessage::from_value(value).unwrap();
        assert_eq!(msg.location.x, 3.0);
    }

    #[test]
    fn rejects_other_events() {
        let mut value = valid();
        value["event"] = json!("click");
        let err = PresenceMessage::from_value(value).unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedEvent(e) if e == "click"));
    }

    #[test]
    fn rejects_missing_fields() {
        for field in ["event", "id", "color", "location"] {
            let mut value = valid();
            value.as_object_mut().unwrap().remove(field);
            let err = PresenceMessage::from_value(value).unwrap_err();
            assert!(matches!(err, ProtocolError::Malformed(_)), "{field}");
        }

        let mut value = valid();
        value["location"].as_object_mut().unwrap().remove("y");
        assert!(PresenceMessage::from_value(value).is_err());
    }

    #[test]
    fn rejects_wrong_types() {
        let mut value = valid();
        value["location"]["x"] = json!("12");
        assert!(matches!(
            PresenceMessage::from_value(value),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(PresenceMessage::from_value(json!("move")).is_err());
        assert!(PresenceMessage::from_value(serde_json::Value::Null).is_err());
    }

    #[test]
    fn rejects_empty_and_oversized_fields() {
        let mut value = valid();
        value["id"] = json!("");
        assert!(matches!(
            PresenceMessage::from_value(value),
            Err(ProtocolError::InvalidField { field: "id", .. })
        ));

        let mut value = valid();
        value["id"] = json!("x".repeat(65));
        assert!(PresenceMessage::from_value(value).is_err());

        let mut value = valid();
        value["location"]["path"] = json!("");
        assert!(matches!(
            PresenceMessage::from_value(value),
            Err(ProtocolError::InvalidField {
                field: "location.path",
                ..
            })
        ));
    }

    #[test]
    fn color_must_be_css_safe() {
        for ok in ["#abc", "rgb(1, 2, 3)", "oklch(70% 0.14 200)", "hsl(10 50% 50% / 0.5)", "teal"] {
            let mut value = valid();
            value["color"] = json!(ok);
            assert!(PresenceMessage::from_value(value).is_ok(), "{ok}");
        }
        for bad in ["red;background:url(x)", "\"><script>", ""] {
            let mut value = valid();
            value["color"] = json!(bad);
            assert!(PresenceMessage::from_value(value).is_err(), "{bad}");
        }
    }

    #[test]
    fn non_finite_offsets_fail_validation() {
        let msg = PresenceMessage::moved(
            "a",
            "#000000",
            Location {
                path: "div".into(),
                x: f64::NAN,
                y: 0.0,
            },
        );
        assert!(matches!(
            msg.validate(),
            Err(ProtocolError::InvalidField {
                field: "location.x",
                ..
            })
        ));
    }
}
