use super::helpers::{validate_ident, validate_range};
use crate::colors::validate_color;
use crate::schema::CursorcastConfig;

pub(super) fn validate_session(errors: &mut Vec<String>, config: &CursorcastConfig) {
    let s = &config.session;
    if !s.participant_id.is_empty() {
        validate_ident(errors, "session.participant_id", &s.participant_id, 64);
    }
    if !s.color.is_empty() && !validate_color(&s.color) {
        errors.push(format!("session.color = {:?} is not a valid color", s.color));
    }
    validate_range(errors, "session.throttle_ms", s.throttle_ms, 0, 1000);
}

pub(super) fn validate_stream(errors: &mut Vec<String>, config: &CursorcastConfig) {
    let s = &config.stream;
    match (s.name.is_empty(), s.signed_token.is_empty()) {
        (true, true) => errors.push("stream: one of name or signed_token is required".into()),
        (false, false) => {
            errors.push("stream: name and signed_token are mutually exclusive".into())
        }
        (false, true) => validate_ident(errors, "stream.name", &s.name, 64),
        (true, false) => {
            if s.signed_token.chars().any(char::is_whitespace) {
                errors.push("stream.signed_token must not contain whitespace".into());
            }
        }
    }
}
