//! Field normalizer — coerces the shapes storage hands back for list-like fields
//! (JSON text, hex-escaped bytea text, real arrays, null) into plain lists.
//!
//! Total over its input: every failure degrades to an empty list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix Postgres puts in front of bytea values rendered as text.
const HEX_MARKER: &str = "\\x";

/// A list-shaped field as it arrives from a request body or a database row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    #[default]
    Null,
    List(Vec<Value>),
    Text(String),
    Flag(bool),
    Other(Value),
}

impl From<Value> for RawField {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawField::Null,
            Value::Array(items) => RawField::List(items),
            Value::String(s) => RawField::Text(s),
            Value::Bool(b) => RawField::Flag(b),
            other => RawField::Other(other),
        }
    }
}

impl From<Option<Value>> for RawField {
    fn from(value: Option<Value>) -> Self {
        value.map(RawField::from).unwrap_or_default()
    }
}

/// Returns the list a raw field encodes, or an empty list if it encodes anything else.
pub fn normalize_field(raw: &RawField) -> Vec<Value> {
    match raw {
        RawField::List(items) => items.clone(),
        RawField::Text(text) => parse_list_text(text),
        RawField::Null | RawField::Flag(_) | RawField::Other(_) => Vec::new(),
    }
}

/// Like [`normalize_field`] but keeps only the items that read as text.
///
/// Objects contribute their `name`, `title`, `label` or `value` member, whichever comes first.
pub fn normalize_strings(raw: &RawField) -> Vec<String> {
    normalize_field(raw)
        .iter()
        .filter_map(item_text)
        .collect()
}

fn parse_list_text(text: &str) -> Vec<Value> {
    let trimmed = text.trim();
    let decoded;
    let json = match trimmed.strip_prefix(HEX_MARKER) {
        Some(hex_body) => match decode_hex_text(hex_body) {
            Some(s) => {
                decoded = s;
                decoded.as_str()
            }
            None => return Vec::new(),
        },
        None => trimmed,
    };

    match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn decode_hex_text(hex_body: &str) -> Option<String> {
    let bytes = hex::decode(hex_body.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

fn item_text(item: &Value) -> Option<String> {
    let text = match item {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => ["name", "title", "label", "value"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(|s| s.trim().to_string())?,
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
