//! Per-column setup and value extraction.

use crate::{ColumnModification, RowCommand};
use bulkwrite_core::{BulkResult, Value, ValueDirection, ValueType};
use std::borrow::Cow;

/// Extracts the outgoing value of one named column from any row command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueExtractor {
    column_name: String,
}

impl ValueExtractor {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
        }
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Outgoing value for this column on `row`.
    ///
    /// Returns `Ok(None)` when the row has no modification for the column.
    /// Otherwise picks the original value, the current value, or the type
    /// default (in that order of precedence) and runs it through the
    /// modification's converter when one is configured.
    pub fn extract<R: RowCommand>(&self, row: &R) -> BulkResult<Option<Value>> {
        let Some(modification) = row
            .column_modifications()
            .iter()
            .find(|m| m.column_name() == self.column_name)
        else {
            return Ok(None);
        };

        let raw: Cow<'_, Value> = if modification.use_original_value() {
            Cow::Borrowed(modification.original_value())
        } else if modification.use_current_value() {
            Cow::Borrowed(modification.current_value())
        } else {
            Cow::Owned(modification.default_value())
        };

        let value = match modification.converter() {
            Some(converter) => converter.convert_to_provider(&raw)?,
            None => raw.into_owned(),
        };

        Ok(Some(value))
    }
}

/// Column descriptor derived once per distinct column name in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSetup {
    ordinal: usize,
    value_type: ValueType,
    direction: ValueDirection,
    extractor: ValueExtractor,
}

impl ColumnSetup {
    pub fn new(
        ordinal: usize,
        column_name: impl Into<String>,
        value_type: ValueType,
        direction: ValueDirection,
    ) -> Self {
        Self {
            ordinal,
            value_type,
            direction,
            extractor: ValueExtractor::new(column_name),
        }
    }

    /// Position in the column list, in first-seen order.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn column_name(&self) -> &str {
        self.extractor.column_name()
    }

    /// Type of the first modification seen for this column.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn direction(&self) -> ValueDirection {
        self.direction
    }

    pub fn extractor(&self) -> &ValueExtractor {
        &self.extractor
    }

    /// See [`ValueExtractor::extract`].
    pub fn extract<R: RowCommand>(&self, row: &R) -> BulkResult<Option<Value>> {
        self.extractor.extract(row)
    }
}
