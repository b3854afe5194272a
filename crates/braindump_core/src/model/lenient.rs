//! Tolerant field decoders for persisted and imported records.
//!
//! Stored snapshots and import files may come from older builds or be
//! hand-edited. A field with an unexpected type or value decodes to its
//! default instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Optional enum-like field; unknown values and wrong types become `None`.
pub(crate) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Text field; numbers and booleans keep their JSON spelling, anything else
/// becomes empty.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_from(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Integer field; floats are truncated, anything else becomes zero.
pub(crate) fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(integer_from(&Value::deserialize(deserializer)?).unwrap_or_default())
}

pub(crate) fn string_from(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(crate) fn integer_from(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|float| float as i64))
}

#[cfg(test)]
mod tests {
    use super::{integer_from, string_from};
    use serde_json::json;

    #[test]
    fn integers_accept_floats_and_reject_text() {
        assert_eq!(integer_from(&json!(7)), Some(7));
        assert_eq!(integer_from(&json!(7.9)), Some(7));
        assert_eq!(integer_from(&json!("7")), None);
    }

    #[test]
    fn strings_keep_scalar_spelling() {
        assert_eq!(string_from(json!(12)).as_deref(), Some("12"));
        assert_eq!(string_from(json!(null)), None);
    }
}
