//! Error types for bulkwrite operations

use thiserror::Error;

/// Errors raised while deriving the column setup from a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("Cannot build column setup from empty batch")]
    EmptyBatch,

    #[error("Mixed tables in batch: row {row} targets {found}, batch targets {expected}")]
    MixedTables {
        expected: String,
        found: String,
        row: usize,
    },
}

/// Errors raised while pushing read-back values into a row command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PropagationError {
    #[error("Missing read-back value for column {column}")]
    MissingReadValue { column: String },

    #[error("Row command rejected propagated values: {reason}")]
    RowRejected { reason: String },
}

/// Value converter errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Converter {converter} expected {expected}, got {found}")]
    TypeMismatch {
        converter: String,
        expected: String,
        found: String,
    },

    #[error("Converter {converter} has no name for discriminant {value}")]
    UnknownDiscriminant { converter: String, value: i64 },

    #[error("Converter {converter} has no discriminant for name {name}")]
    UnknownName { converter: String, name: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all bulkwrite errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BulkError {
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for bulkwrite operations.
pub type BulkResult<T> = Result<T, BulkError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display_empty_batch() {
        let msg = format!("{}", SetupError::EmptyBatch);
        assert!(msg.contains("empty batch"));
    }

    #[test]
    fn test_setup_error_display_mixed_tables() {
        let err = SetupError::MixedTables {
            expected: "dbo.Orders".to_string(),
            found: "dbo.Customers".to_string(),
            row: 3,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("row 3"));
        assert!(msg.contains("dbo.Orders"));
        assert!(msg.contains("dbo.Customers"));
    }

    #[test]
    fn test_propagation_error_display_missing_read_value() {
        let err = PropagationError::MissingReadValue {
            column: "Id".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Missing read-back value"));
        assert!(msg.contains("Id"));
    }

    #[test]
    fn test_conversion_error_display_type_mismatch() {
        let err = ConversionError::TypeMismatch {
            converter: "bool_to_number".to_string(),
            expected: "bool".to_string(),
            found: "text".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("bool_to_number"));
        assert!(msg.contains("text"));
    }

    #[test]
    fn test_bulk_error_from_variants() {
        let setup = BulkError::from(SetupError::EmptyBatch);
        assert!(matches!(setup, BulkError::Setup(_)));

        let propagation = BulkError::from(PropagationError::RowRejected {
            reason: "arity".to_string(),
        });
        assert!(matches!(propagation, BulkError::Propagation(_)));

        let conversion = BulkError::from(ConversionError::UnknownDiscriminant {
            converter: "enum".to_string(),
            value: 9,
        });
        assert!(matches!(conversion, BulkError::Conversion(_)));

        let config = BulkError::from(ConfigError::Parse {
            reason: "eof".to_string(),
        });
        assert!(matches!(config, BulkError::Config(_)));
    }
}
