//! Request body encoding.
//!
//! JSON mode is plain `serde_json`. Form mode flattens a JSON object into
//! `application/x-www-form-urlencoded` pairs using bracket notation, the
//! convention form-era servers expect: `model[name]=a`, `tags[]=x` for
//! arrays of scalars and `items[0][id]=1` for arrays of containers.

use serde_json::Value;
use url::form_urlencoded;

use crate::error::{SyncError, SyncResult};
use crate::http::BodyEncoding;

/// Encode `data` for the wire according to `encoding`.
pub fn encode_body(data: &Value, encoding: BodyEncoding) -> SyncResult<Vec<u8>> {
    match encoding {
        BodyEncoding::Json => serde_json::to_vec(data).map_err(|e| SyncError::Encoding(e.to_string())),
        BodyEncoding::Form => form_encode(data).map(String::into_bytes),
    }
}

/// Flatten a JSON object into a form-urlencoded string.
pub fn form_encode(data: &Value) -> SyncResult<String> {
    let Value::Object(map) = data else {
        return Err(SyncError::Encoding(format!(
            "form bodies must be JSON objects, got {}",
            kind(data)
        )));
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        flatten(key, value, &mut pairs);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    Ok(serializer.finish())
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(&format!("{prefix}[{key}]"), nested, out);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    flatten(&format!("{prefix}[{index}]"), item, out);
                } else {
                    flatten(&format!("{prefix}[]"), item, out);
                }
            }
        }
        Value::Null => out.push((prefix.to_string(), String::new())),
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        Value::Bool(_) | Value::Number(_) => out.push((prefix.to_string(), value.to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
