//! Input values held by the input store.

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// A value edited in a procedure form.
///
/// `Undefined` and `Null` are distinct: an optional field starts out as one
/// or the other depending on its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<FixedOffset>),
    List(Vec<InputValue>),
    Record(IndexMap<String, InputValue>),
}

impl InputValue {
    /// An empty record.
    pub fn empty_record() -> Self {
        Self::Record(IndexMap::new())
    }

    /// Returns true for `undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Name of the variant, as shown in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    /// Convert to JSON.
    ///
    /// `undefined` record fields are omitted, `undefined` list elements
    /// become `null`, dates become RFC 3339 strings and non-finite numbers
    /// become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Undefined | Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::String(s) => Value::String(s.clone()),
            Self::Date(d) => Value::String(d.to_rfc3339()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Record(fields) => Value::Object(
                fields
                    .iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Convert from JSON. `null` maps to `Null`; strings stay strings.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(fields) => Self::Record(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<FixedOffset>> for InputValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_undefined_omitted_from_records_and_null_in_lists() {
        let mut fields = IndexMap::new();
        fields.insert("a".to_string(), InputValue::Undefined);
        fields.insert("b".to_string(), InputValue::Null);
        fields.insert(
            "c".to_string(),
            InputValue::List(vec![InputValue::Undefined, InputValue::Number(1.0)]),
        );
        let value = InputValue::Record(fields);
        assert_eq!(value.to_json(), json!({"b": null, "c": [null, 1.0]}));
    }

    #[test]
    fn test_date_serializes_rfc3339() {
        let date = DateTime::parse_from_rfc3339("2024-01-02T03:04:05+02:00").unwrap();
        assert_eq!(
            InputValue::Date(date).to_json(),
            json!("2024-01-02T03:04:05+02:00")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(InputValue::Undefined.to_string(), "undefined");
        assert_eq!(InputValue::from("x").to_string(), "\"x\"");
        assert_eq!(InputValue::from(false).to_string(), "false");
    }

    #[test]
    fn test_from_json_keeps_order() {
        let value = InputValue::from_json(&json!({"z": 1, "a": [true]}));
        let InputValue::Record(fields) = value else {
            panic!("expected record");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["z", "a"]);
    }
}
