//! Configuration types

use crate::{BulkError, BulkResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do when a row expects a read-back value the caller did not supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Fail with `PropagationError::MissingReadValue`
    #[default]
    Fail,
    /// Substitute `Value::Null` and log a warning
    Null,
}

impl fmt::Display for MissingValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingValuePolicy::Fail => f.write_str("fail"),
            MissingValuePolicy::Null => f.write_str("null"),
        }
    }
}

impl FromStr for MissingValuePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(MissingValuePolicy::Fail),
            "null" => Ok(MissingValuePolicy::Null),
            other => Err(ConfigError::InvalidValue {
                field: "missing_read_value".to_string(),
                value: other.to_string(),
                reason: "expected 'fail' or 'null'".to_string(),
            }),
        }
    }
}

/// Column setup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Reject batches whose row commands target different tables.
    pub validate_table_consistency: bool,
    /// Handling of missing read-back values during propagation.
    pub missing_read_value: MissingValuePolicy,
    /// Capacity hint for the number of distinct columns.
    pub expected_columns: Option<usize>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            validate_table_consistency: true,
            missing_read_value: MissingValuePolicy::Fail,
            expected_columns: None,
        }
    }
}

impl SetupConfig {
    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `BULKWRITE_VALIDATE_TABLE_CONSISTENCY`: `true`/`false` (default: true)
    /// - `BULKWRITE_MISSING_READ_VALUE`: `fail`/`null` (default: fail)
    /// - `BULKWRITE_EXPECTED_COLUMNS`: column capacity hint (default: unset)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SetupConfig::from_env`] with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            validate_table_consistency: lookup("BULKWRITE_VALIDATE_TABLE_CONSISTENCY")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.validate_table_consistency),
            missing_read_value: lookup("BULKWRITE_MISSING_READ_VALUE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.missing_read_value),
            expected_columns: lookup("BULKWRITE_EXPECTED_COLUMNS")
                .and_then(|s| s.trim().parse().ok())
                .or(defaults.expected_columns),
        }
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> BulkResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> BulkResult<()> {
        if self.expected_columns == Some(0) {
            return Err(BulkError::Config(ConfigError::InvalidValue {
                field: "expected_columns".to_string(),
                value: "0".to_string(),
                reason: "expected_columns must be greater than 0 when set".to_string(),
            }));
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
