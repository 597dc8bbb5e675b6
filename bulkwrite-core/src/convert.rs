//! Value converters mapping in-memory values to provider values.
//!
//! A converter is attached to a column modification by the row-command
//! implementation. The column setup applies `convert_to_provider` to every
//! outgoing value for that column (current, original, or type default).
//! `Null` always passes through unchanged.

use crate::{ConversionError, Value};
use std::fmt;

/// Maps an in-memory value to the representation the data engine expects.
pub trait ValueConverter: fmt::Debug + Send + Sync {
    /// Name used in error messages.
    fn name(&self) -> &str;

    /// Convert an in-memory value into its provider representation.
    fn convert_to_provider(&self, value: &Value) -> Result<Value, ConversionError>;

    /// Convert a provider value back into its in-memory representation.
    fn convert_from_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        Ok(value.clone())
    }
}

fn mismatch(converter: &str, expected: &str, found: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        converter: converter.to_string(),
        expected: expected.to_string(),
        found: found.kind_name().to_string(),
    }
}

// ============================================================================
// BOOL <-> NUMBER
// ============================================================================

/// Stores a `bool` as `0`/`1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolToNumberConverter;

impl ValueConverter for BoolToNumberConverter {
    fn name(&self) -> &str {
        "bool_to_number"
    }

    fn convert_to_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
            other => Err(mismatch(self.name(), "bool", other)),
        }
    }

    fn convert_from_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Int(n) => Ok(Value::Bool(*n != 0)),
            other => Err(mismatch(self.name(), "int", other)),
        }
    }
}

// ============================================================================
// ENUM <-> STRING
// ============================================================================

/// Stores an integer enum discriminant as its variant name.
#[derive(Debug, Clone)]
pub struct EnumToStringConverter {
    name: String,
    variants: Vec<(i64, String)>,
}

impl EnumToStringConverter {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(|(d, s)| (d, s.into())).collect(),
        }
    }
}

impl ValueConverter for EnumToStringConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn convert_to_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Int(discriminant) => self
                .variants
                .iter()
                .find(|(d, _)| d == discriminant)
                .map(|(_, s)| Value::Text(s.clone()))
                .ok_or_else(|| ConversionError::UnknownDiscriminant {
                    converter: self.name.clone(),
                    value: *discriminant,
                }),
            other => Err(mismatch(&self.name, "int", other)),
        }
    }

    fn convert_from_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Text(text) => self
                .variants
                .iter()
                .find(|(_, s)| s == text)
                .map(|(d, _)| Value::Int(*d))
                .ok_or_else(|| ConversionError::UnknownName {
                    converter: self.name.clone(),
                    name: text.clone(),
                }),
            other => Err(mismatch(&self.name, "text", other)),
        }
    }
}

// ============================================================================
// UUID <-> BYTES
// ============================================================================

/// Stores a UUID as its 16 raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidToBytesConverter;

impl ValueConverter for UuidToBytesConverter {
    fn name(&self) -> &str {
        "uuid_to_bytes"
    }

    fn convert_to_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Uuid(id) => Ok(Value::Bytes(id.as_bytes().to_vec())),
            other => Err(mismatch(self.name(), "uuid", other)),
        }
    }

    fn convert_from_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Bytes(bytes) => uuid::Uuid::from_slice(bytes)
                .map(Value::Uuid)
                .map_err(|_| ConversionError::TypeMismatch {
                    converter: self.name().to_string(),
                    expected: "16 bytes".to_string(),
                    found: format!("{} bytes", bytes.len()),
                }),
            other => Err(mismatch(self.name(), "bytes", other)),
        }
    }
}

// ============================================================================
// FUNCTION POINTER
// ============================================================================

/// Conversion function signature accepted by [`FnConverter`].
pub type ConvertFn = fn(&Value) -> Result<Value, ConversionError>;

/// Converter backed by plain function pointers.
#[derive(Clone)]
pub struct FnConverter {
    name: &'static str,
    to_provider: ConvertFn,
    from_provider: Option<ConvertFn>,
}

impl FnConverter {
    pub fn new(name: &'static str, to_provider: ConvertFn) -> Self {
        Self {
            name,
            to_provider,
            from_provider: None,
        }
    }

    pub fn with_reverse(mut self, from_provider: ConvertFn) -> Self {
        self.from_provider = Some(from_provider);
        self
    }
}

impl fmt::Debug for FnConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter")
            .field("name", &self.name)
            .field("reversible", &self.from_provider.is_some())
            .finish()
    }
}

impl ValueConverter for FnConverter {
    fn name(&self) -> &str {
        self.name
    }

    fn convert_to_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        (self.to_provider)(value)
    }

    fn convert_from_provider(&self, value: &Value) -> Result<Value, ConversionError> {
        match self.from_provider {
            Some(f) if !value.is_null() => f(value),
            _ => Ok(value.clone()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn status_converter() -> EnumToStringConverter {
        EnumToStringConverter::new("order_status", [(0, "Pending"), (1, "Shipped")])
    }

    #[test]
    fn test_bool_to_number() {
        let c = BoolToNumberConverter;
        assert_eq!(c.convert_to_provider(&Value::Bool(true)).unwrap(), Value::Int(1));
        assert_eq!(c.convert_to_provider(&Value::Bool(false)).unwrap(), Value::Int(0));
        assert_eq!(c.convert_from_provider(&Value::Int(1)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_bool_to_number_rejects_text() {
        let err = BoolToNumberConverter
            .convert_to_provider(&Value::from("yes"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::TypeMismatch { .. }));
    }

    #[test]
    fn test_enum_to_string_known_and_unknown() {
        let c = status_converter();
        assert_eq!(
            c.convert_to_provider(&Value::Int(1)).unwrap(),
            Value::from("Shipped")
        );
        assert_eq!(
            c.convert_to_provider(&Value::Int(7)).unwrap_err(),
            ConversionError::UnknownDiscriminant {
                converter: "order_status".to_string(),
                value: 7,
            }
        );
        assert_eq!(
            c.convert_from_provider(&Value::from("Pending")).unwrap(),
            Value::Int(0)
        );
    }

    #[test]
    fn test_uuid_to_bytes_rejects_short_slice() {
        let err = UuidToBytesConverter
            .convert_from_provider(&Value::Bytes(vec![1, 2, 3]))
            .unwrap_err();
        assert!(err.to_string().contains("3 bytes"));
    }

    #[test]
    fn test_fn_converter_skips_null() {
        fn upper(v: &Value) -> Result<Value, ConversionError> {
            match v {
                Value::Text(s) => Ok(Value::Text(s.to_uppercase())),
                other => Ok(other.clone()),
            }
        }

        let c = FnConverter::new("upper", upper);
        assert_eq!(c.convert_to_provider(&Value::from("ab")).unwrap(), Value::from("AB"));
        assert_eq!(c.convert_to_provider(&Value::Null).unwrap(), Value::Null);
        // No reverse function: identity
        assert_eq!(c.convert_from_provider(&Value::from("AB")).unwrap(), Value::from("AB"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: every stock converter passes Null through unchanged.
        #[test]
        fn prop_null_passes_through(_dummy in any::<u8>()) {
            let converters: Vec<Box<dyn ValueConverter>> = vec![
                Box::new(BoolToNumberConverter),
                Box::new(status_converter()),
                Box::new(UuidToBytesConverter),
            ];
            for c in &converters {
                prop_assert_eq!(c.convert_to_provider(&Value::Null).unwrap(), Value::Null);
                prop_assert_eq!(c.convert_from_provider(&Value::Null).unwrap(), Value::Null);
            }
        }

        /// Property: uuid bytes are recoverable.
        #[test]
        fn prop_uuid_bytes_recoverable(bytes in any::<[u8; 16]>()) {
            let id = Uuid::from_bytes(bytes);
            let provider = UuidToBytesConverter.convert_to_provider(&Value::Uuid(id)).unwrap();
            prop_assert_eq!(provider.clone(), Value::Bytes(bytes.to_vec()));
            prop_assert_eq!(
                UuidToBytesConverter.convert_from_provider(&provider).unwrap(),
                Value::Uuid(id)
            );
        }
    }
}
