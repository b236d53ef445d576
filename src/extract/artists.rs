//! Permissive parsing of the serialized artist lists stored in album rows.
//!
//! The column is meant to hold a JSON array of names, but rows written by hand
//! or by older tools contain bare names or broken JSON. None of that may fail
//! an extraction, so every input maps to some list:
//!
//! | Raw value | Result |
//! |-----------|--------|
//! | absent / `""` | `[]` |
//! | `["A", "B"]` | `["A", "B"]` |
//! | valid JSON that is not a list (`"A"`, `42`) | `[raw]` |
//! | invalid JSON (`A, B`) | `[raw]` |

use serde_json::Value;
use std::collections::HashSet;

/// Parse an artist field, falling back to the raw value as a single entry.
///
/// Non-string list elements are kept as their JSON text; `null` elements are
/// dropped.
pub fn parse_or_fallback(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Ok(_) => fallback(raw),
        Err(err) => {
            tracing::debug!(raw, error = %err, "Artist field is not valid JSON; using raw value");
            fallback(raw)
        }
    }
}

/// The raw field as a one-element list.
fn fallback(raw: &str) -> Vec<String> {
    vec![raw.to_string()]
}

/// Number of distinct artist names across serialized artist fields.
///
/// Names are trimmed and blank names skipped; comparison is exact and
/// case-sensitive.
pub fn count_distinct<'a>(fields: impl IntoIterator<Item = &'a str>) -> usize {
    let mut names = HashSet::new();
    for field in fields {
        for artist in parse_or_fallback(Some(field)) {
            let trimmed = artist.trim();
            if !trimmed.is_empty() {
                names.insert(trimmed.to_string());
            }
        }
    }
    names.len()
}
