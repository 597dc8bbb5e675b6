//! Provider values, semantic column types and positional value buffers.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// VALUE
// ============================================================================

/// A single column value as exchanged with the data engine.
///
/// `Null` doubles as the absence value: a column that has no explicit value
/// for a row is represented as `Null` in outgoing and read-back buffers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Timestamp(Timestamp),
}

impl Value {
    /// Short lowercase name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "'{}'", v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Uuid(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// VALUE TYPE
// ============================================================================

/// Kind of an in-memory column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Float64,
    Text,
    Bytes,
    Uuid,
    Timestamp,
}

impl ValueKind {
    /// Reference-like kinds have no non-null default.
    pub const fn is_reference(&self) -> bool {
        matches!(self, ValueKind::Text | ValueKind::Bytes)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Byte => "byte",
            ValueKind::Int16 => "int16",
            ValueKind::Int32 => "int32",
            ValueKind::Int64 => "int64",
            ValueKind::Float64 => "float64",
            ValueKind::Text => "text",
            ValueKind::Bytes => "bytes",
            ValueKind::Uuid => "uuid",
            ValueKind::Timestamp => "timestamp",
        }
    }
}

/// Semantic type of a column: its kind plus nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    pub kind: ValueKind,
    pub nullable: bool,
}

impl ValueType {
    pub const fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    pub const fn nullable(kind: ValueKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }

    /// The value used when a modification carries neither its current nor
    /// its original value.
    ///
    /// Nullable and reference-like types default to `Null`; numeric kinds
    /// default to zero, `Uuid` to nil and `Timestamp` to the Unix epoch.
    pub fn default_value(&self) -> Value {
        if self.nullable || self.kind.is_reference() {
            return Value::Null;
        }

        match self.kind {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Byte | ValueKind::Int16 | ValueKind::Int32 | ValueKind::Int64 => {
                Value::Int(0)
            }
            ValueKind::Float64 => Value::Float(0.0),
            ValueKind::Uuid => Value::Uuid(Uuid::nil()),
            ValueKind::Timestamp => Value::Timestamp(Timestamp::UNIX_EPOCH),
            ValueKind::Text | ValueKind::Bytes => Value::Null,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

// ============================================================================
// VALUE BUFFER
// ============================================================================

/// Ordered, positional collection of values handed to a row command when
/// read-back values are propagated.
///
/// Positions line up with the row command's own read-flagged modifications,
/// not with the batch-wide column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueBuffer(Vec<Value>);

impl ValueBuffer {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for ValueBuffer {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for ValueBuffer {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueBuffer {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueBuffer {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_non_nullable_numbers_are_zero() {
        for kind in [
            ValueKind::Byte,
            ValueKind::Int16,
            ValueKind::Int32,
            ValueKind::Int64,
        ] {
            assert_eq!(ValueType::new(kind).default_value(), Value::Int(0));
        }
        assert_eq!(
            ValueType::new(ValueKind::Float64).default_value(),
            Value::Float(0.0)
        );
    }

    #[test]
    fn test_default_value_reference_and_nullable_are_null() {
        assert_eq!(ValueType::new(ValueKind::Text).default_value(), Value::Null);
        assert_eq!(ValueType::new(ValueKind::Bytes).default_value(), Value::Null);
        assert_eq!(
            ValueType::nullable(ValueKind::Int32).default_value(),
            Value::Null
        );
    }

    #[test]
    fn test_default_value_bool_uuid_timestamp() {
        assert_eq!(
            ValueType::new(ValueKind::Bool).default_value(),
            Value::Bool(false)
        );
        assert_eq!(
            ValueType::new(ValueKind::Uuid).default_value(),
            Value::Uuid(Uuid::nil())
        );
        assert_eq!(
            ValueType::new(ValueKind::Timestamp).default_value(),
            Value::Timestamp(Timestamp::UNIX_EPOCH)
        );
    }

    #[test]
    fn test_value_type_display() {
        assert_eq!(ValueType::new(ValueKind::Int32).to_string(), "int32");
        assert_eq!(ValueType::nullable(ValueKind::Uuid).to_string(), "uuid?");
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn test_value_serde_shape() {
        let json = serde_json::to_string(&Value::Int(42)).unwrap();
        assert_eq!(json, r#"{"Int":42}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Int(42));
    }

    #[test]
    fn test_value_buffer_positions() {
        let buffer: ValueBuffer = vec![Value::Int(1), Value::Null].into();
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.get(0), Some(&Value::Int(1)));
        assert_eq!(buffer.get(1), Some(&Value::Null));
        assert_eq!(buffer.get(2), None);
        assert!(ValueBuffer::default().is_empty());
    }
}
