#![forbid(unsafe_code)]

//! Records and record keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name under which a record is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    /// Create a key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Errors from encoding or decoding a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Stored bytes are not a JSON object of scalar values.
    Malformed(String),
    /// The record could not be serialized.
    Encode(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Malformed(msg) => write!(f, "malformed stored record: {msg}"),
            RecordError::Encode(msg) => write!(f, "record encode error: {msg}"),
        }
    }
}

impl std::error::Error for RecordError {}

/// A flat mapping from field name to string value.
///
/// Numeric fields are strings too, so masked formatting survives storage.
/// Records built through a [`FormSchema`](crate::FormSchema) carry exactly
/// the schema's fields; [`set`](Self::set) only replaces existing fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Record with the given field names, all empty.
    #[must_use]
    pub fn with_fields<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            fields: names
                .into_iter()
                .map(|name| (name.to_string(), String::new()))
                .collect(),
        }
    }

    /// Value of a field, if the field exists.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Replace the value of an existing field.
    ///
    /// Returns `false` (and changes nothing) if the field is unknown.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Whether the record has a field with this name.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize to a JSON object.
    pub fn to_json(&self) -> Result<String, RecordError> {
        serde_json::to_string(self).map_err(|e| RecordError::Encode(e.to_string()))
    }

    /// Decode a stored JSON object without schema conformance.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified and
    /// `null` becomes an empty string. Nested arrays or objects, or a
    /// top-level value that is not an object, make the record malformed.
    pub fn decode_loose(json: &str) -> Result<BTreeMap<String, String>, RecordError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| RecordError::Malformed(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(RecordError::Malformed("expected a JSON object".into()));
        };

        let mut fields = BTreeMap::new();
        for (name, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(RecordError::Malformed(format!(
                        "field {name:?} is not a scalar"
                    )));
                }
            };
            fields.insert(name, value);
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_only_replaces_known_fields() {
        let mut record = Record::with_fields(["cvv", "numeroCartao"]);
        assert!(record.set("cvv", "123"));
        assert!(!record.set("extra", "x"));
        assert_eq!(record.get("cvv"), Some("123"));
        assert_eq!(record.get("extra"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn json_is_a_flat_object() {
        let mut record = Record::with_fields(["nome", "idade"]);
        record.set("nome", "Maria");
        record.set("idade", "30");
        assert_eq!(record.to_json().unwrap(), r#"{"idade":"30","nome":"Maria"}"#);
    }

    #[test]
    fn decode_loose_stringifies_scalars() {
        let fields =
            Record::decode_loose(r#"{"nome":"Ana","idade":30,"ativo":true,"pai":null}"#).unwrap();
        assert_eq!(fields["nome"], "Ana");
        assert_eq!(fields["idade"], "30");
        assert_eq!(fields["ativo"], "true");
        assert_eq!(fields["pai"], "");
    }

    #[test]
    fn decode_loose_rejects_non_objects() {
        assert!(matches!(
            Record::decode_loose("[1,2]"),
            Err(RecordError::Malformed(_))
        ));
        assert!(matches!(
            Record::decode_loose("not json"),
            Err(RecordError::Malformed(_))
        ));
        assert!(matches!(
            Record::decode_loose(r#"{"a":{"b":1}}"#),
            Err(RecordError::Malformed(_))
        ));
    }

    #[test]
    fn record_key_display() {
        let key = RecordKey::from("pagamento");
        assert_eq!(key.to_string(), "pagamento");
        assert_eq!(key.as_str(), "pagamento");
    }

    #[test]
    fn record_error_display() {
        let err = RecordError::Malformed("expected a JSON object".into());
        assert!(err.to_string().contains("malformed"));
    }
}
