//! Unpacking of the listing API's response envelope.
//!
//! A well-formed envelope looks like `{"response": {"snippets": [...]}}`.
//! Anything else is reported as an [`EnvelopeIssue`], which callers log and
//! skip rather than treat as fatal.

use std::fmt::Write as _;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeIssue {
    /// The envelope is not an object or has no `response` key.
    MissingResponse,
    /// `response` has no `snippets` array.
    MissingSnippets,
}

impl std::fmt::Display for EnvelopeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeIssue::MissingResponse => write!(f, "invalid response format"),
            EnvelopeIssue::MissingSnippets => write!(f, "no snippets found in response"),
        }
    }
}

/// Returns the snippet list carried by a listing envelope.
///
/// # Errors
///
/// Returns the [`EnvelopeIssue`] describing which level of the envelope is
/// missing.
pub fn listing_snippets(envelope: &Value) -> Result<&[Value], EnvelopeIssue> {
    let response = envelope
        .get("response")
        .ok_or(EnvelopeIssue::MissingResponse)?;
    response
        .get("snippets")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(EnvelopeIssue::MissingSnippets)
}

/// Renders a depth-limited outline of a JSON value's keys and scalar types.
///
/// Objects list each key; arrays show their length and outline only their
/// first element. Used to log the shape of envelopes that fail to unpack.
#[must_use]
pub fn describe_shape(value: &Value, max_depth: usize) -> String {
    let mut out = String::new();
    outline(value, 0, max_depth, &mut out);
    out
}

fn outline(value: &Value, depth: usize, max_depth: usize, out: &mut String) {
    if depth >= max_depth {
        return;
    }
    let prefix = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let _ = writeln!(out, "{prefix}Key: {key}");
                if child.is_object() || child.is_array() {
                    outline(child, depth + 1, max_depth, out);
                } else {
                    let _ = writeln!(out, "{prefix}Value: {child} ({})", type_name(child));
                }
            }
        }
        Value::Array(items) => {
            let _ = writeln!(out, "{prefix}List length: {}", items.len());
            if let Some(first) = items.first() {
                outline(first, depth + 1, max_depth, out);
            }
        }
        scalar => {
            let _ = writeln!(out, "{prefix}Value: {scalar} ({})", type_name(scalar));
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
