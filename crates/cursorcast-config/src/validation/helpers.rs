//! Shared helpers used by the section validators.

use regex::Regex;
use std::sync::LazyLock;

/// Characters allowed in participant ids and stream names.
pub(crate) static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is longer than `max` chars or has characters
/// outside `[A-Za-z0-9_-]`.
pub(crate) fn validate_ident(errors: &mut Vec<String>, name: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(format!("{name} is longer than {max} characters"));
    }
    if !IDENT_RE.is_match(value) {
        errors.push(format!(
            "{name} = {value:?} may only contain letters, digits, '_' and '-'"
        ));
    }
}
