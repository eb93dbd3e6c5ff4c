//! # Persisted channel references.
//!
//! A [`ChannelState`] records *which* channel a piece of state refers to, never
//! the channel's value. Its document form has exactly two string fields:
//!
//! ```text
//! { "typeID": <string>, "nameID": <string> }
//! ```
//!
//! ## Rules
//! - [`ChannelState::from_value`] / [`ChannelState::parse`] are strict and report a [`StateError`].
//! - [`ChannelState::lenient`] reads a missing or non-string field as `""`,
//!   which resolves to the invalid token (and thus an invalid handle).
//! - [`ChannelState::resolve`] goes through [`Bus::handle`], so it creates the
//!   channel (with the same notifications) when it does not exist yet.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::channels::ChannelHandle;
use crate::core::Bus;
use crate::error::StateError;
use crate::id::Id;

/// Document key of the type token.
pub const TYPE_FIELD: &str = "typeID";
/// Document key of the name token.
pub const NAME_FIELD: &str = "nameID";

/// Serializable `(typeID, nameID)` projection of a channel handle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelState {
    /// String form of the type token.
    #[serde(rename = "typeID")]
    pub type_id: String,
    /// String form of the name token.
    #[serde(rename = "nameID")]
    pub name_id: String,
}

impl ChannelState {
    /// Creates a record from two token strings.
    pub fn new(type_id: impl Into<String>, name_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            name_id: name_id.into(),
        }
    }

    /// Decodes a record, requiring both fields to be strings.
    pub fn from_value(value: &Value) -> Result<Self, StateError> {
        let map = value.as_object().ok_or(StateError::NotAnObject)?;
        Ok(Self::new(
            string_field(map, TYPE_FIELD)?,
            string_field(map, NAME_FIELD)?,
        ))
    }

    /// Parses a record from JSON text.
    pub fn parse(text: &str) -> Result<Self, StateError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Decodes a record, reading anything missing or malformed as `""`.
    pub fn lenient(value: &Value) -> Self {
        Self::new(
            lenient_field(value, TYPE_FIELD),
            lenient_field(value, NAME_FIELD),
        )
    }

    /// Encodes the record as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(2);
        map.insert(TYPE_FIELD.to_owned(), Value::String(self.type_id.clone()));
        map.insert(NAME_FIELD.to_owned(), Value::String(self.name_id.clone()));
        Value::Object(map)
    }

    /// Looks the channel up on `bus`, creating it if needed.
    pub fn resolve(&self, bus: &Bus) -> ChannelHandle {
        bus.handle(&Id::new(&self.type_id), &Id::new(&self.name_id))
    }
}

impl From<&ChannelHandle> for ChannelState {
    fn from(handle: &ChannelHandle) -> Self {
        Self::new(handle.type_id().as_str(), handle.name_id().as_str())
    }
}

fn string_field<'a>(map: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, StateError> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(StateError::NotAString { field }),
        None => Err(StateError::MissingField { field }),
    }
}

fn lenient_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value.get(field).and_then(Value::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_value_has_exactly_two_fields() {
        let v = ChannelState::new("camera", "main").to_value();
        assert_eq!(v, json!({"typeID": "camera", "nameID": "main"}));
        assert_eq!(v.as_object().map(Map::len), Some(2));
    }

    #[test]
    fn test_serde_derive_uses_document_keys() {
        let state: ChannelState =
            serde_json::from_str(r#"{"typeID":"camera","nameID":"main"}"#).unwrap();
        assert_eq!(state, ChannelState::new("camera", "main"));
        assert_eq!(serde_json::to_value(&state).unwrap(), state.to_value());
    }

    #[test]
    fn test_strict_decode_reports_problems() {
        let missing = ChannelState::from_value(&json!({"typeID": "camera"})).unwrap_err();
        assert!(matches!(missing, StateError::MissingField { field: "nameID" }));

        let wrong = ChannelState::from_value(&json!({"typeID": 3, "nameID": "x"})).unwrap_err();
        assert!(matches!(wrong, StateError::NotAString { field: "typeID" }));

        let not_obj = ChannelState::from_value(&json!(["typeID", "nameID"])).unwrap_err();
        assert!(matches!(not_obj, StateError::NotAnObject));

        let bad = ChannelState::parse("{\"typeID\":").unwrap_err();
        assert_eq!(bad.as_label(), "state_invalid_json");
    }

    #[test]
    fn test_parse_ok() {
        let state = ChannelState::parse(r#"{"typeID":"a","nameID":"b","extra":1}"#).unwrap();
        assert_eq!(state, ChannelState::new("a", "b"));
    }

    #[test]
    fn test_lenient_decode_defaults_to_empty() {
        assert_eq!(
            ChannelState::lenient(&json!({"nameID": "x"})),
            ChannelState::new("", "x")
        );
        assert_eq!(ChannelState::lenient(&json!(null)), ChannelState::default());
        assert_eq!(
            ChannelState::lenient(&json!({"typeID": 1, "nameID": "x"})),
            ChannelState::new("", "x")
        );
    }
}
