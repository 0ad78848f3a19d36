use crate::errors::{CatalogError, Result};

/// Serializes a value to pretty JSON with canonical error handling.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CatalogError::SerializationError(err.to_string()))
}

/// Deserializes a JSON string into the provided type with shared error semantics.
pub fn from_json_str<T: serde::de::DeserializeOwned>(input: &str) -> Result<T> {
    serde_json::from_str(input).map_err(|err| CatalogError::DeserializationError(err.to_string()))
}

/// Parses a JSON object literal, rejecting any other JSON value.
pub fn json_object_from_str(input: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
    match from_json_str::<serde_json::Value>(input)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(CatalogError::DeserializationError(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
