//! Data-Binding Resolution
//!
//! Resolves `{{/path/to/data}}` expressions against a surface's data
//! model. A field that is exactly one binding resolves to the raw value at
//! that path, preserving its type; bindings interleaved with literal text
//! resolve to stringified values substituted in place. An unresolved path
//! leaves the literal `{{path}}` text untouched, since controllers frequently
//! bind fields before the data arrives.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Matches a value that is a single binding expression (whitespace around
/// and inside the braces tolerated)
static FULL_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\{\{(.+?)\}\}\s*$").expect("full binding pattern is valid")
});

/// Matches binding occurrences embedded in a larger string
static INLINE_BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("inline binding pattern is valid"));

/// Read a value from the data model using a slash-delimited pointer path
///
/// Only mapping segments are traversed; a path into an array or scalar
/// does not resolve. Returns None when any segment is absent.
#[must_use]
pub fn pointer_get<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let trimmed = path.trim_matches('/');
    let mut current: Option<&Value> = None;
    for part in trimmed.split('/') {
        current = match current {
            None => data.get(part),
            Some(Value::Object(obj)) => obj.get(part),
            Some(_) => return None,
        };
        current?;
    }
    current
}

/// Stringify a resolved value for inline substitution
///
/// Strings interpolate verbatim; everything else uses its JSON text.
#[must_use]
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolve bindings in a field value
///
/// Non-string values pass through unchanged. A `null` in the data model
/// counts as unresolved, the same as an absent path.
#[must_use]
pub fn resolve_binding(value: &Value, data: &Map<String, Value>) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };

    if let Some(caps) = FULL_BINDING.captures(text) {
        let path = caps[1].trim();
        return match pointer_get(data, path) {
            Some(resolved) if !resolved.is_null() => resolved.clone(),
            _ => value.clone(),
        };
    }

    let replaced = INLINE_BINDING.replace_all(text, |caps: &Captures<'_>| {
        let path = caps[1].trim();
        match pointer_get(data, path) {
            Some(resolved) if !resolved.is_null() => display_string(resolved),
            _ => caps[0].to_string(),
        }
    });
    Value::String(replaced.into_owned())
}
