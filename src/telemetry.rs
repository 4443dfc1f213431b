//! Telemetry input bag.
//!
//! An update arrives as a single sparse JSON object. The same payload drives
//! both the partial record merge and the rule evaluation, so the bag is
//! parsed **once** per invocation and then read immutably — merge and rules
//! always observe an identical snapshot.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Dynamically typed view of one bag field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// The field is not present in the payload. Distinct from any value.
    Absent,
    /// A finite JSON number.
    Number(f64),
    Bool(bool),
    Text(&'a str),
    /// Present but of a type no rule consumes (object, array, null,
    /// non-finite number).
    Other,
}

/// Immutable field-name → value mapping for one update payload.
#[derive(Debug, Clone, Default)]
pub struct TelemetryBag {
    fields: Map<String, Value>,
}

impl TelemetryBag {
    /// Parse a bag from raw payload bytes. The payload must be a JSON
    /// object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|_| Error::MalformedPayload("payload is not valid JSON"))?;
        Self::from_value(value)
    }

    /// Build a bag from an already-parsed payload value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(Error::MalformedPayload("payload must be a JSON object")),
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> FieldValue<'_> {
        match self.fields.get(name) {
            None => FieldValue::Absent,
            Some(Value::Number(n)) => n.as_f64().map_or(FieldValue::Other, FieldValue::Number),
            Some(Value::Bool(b)) => FieldValue::Bool(*b),
            Some(Value::String(s)) => FieldValue::Text(s),
            Some(_) => FieldValue::Other,
        }
    }

    /// Whether `name` is present with boolean value `true`. Any other type
    /// is treated as absent.
    pub fn flag_is_set(&self, name: &str) -> bool {
        matches!(self.field(name), FieldValue::Bool(true))
    }

    /// The bag as a JSON value, for deserializing a typed record view of
    /// the same snapshot the rules read.
    pub fn as_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
