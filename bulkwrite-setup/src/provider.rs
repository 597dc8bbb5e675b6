//! Orchestrator-facing seam over a column setup.

use crate::{ColumnSetup, ColumnSetupBuilder, RowCommand};
use bulkwrite_core::{BulkResult, Value};
use std::collections::HashMap;

/// What a bulk-write orchestrator needs from a column setup: the ordered
/// column list, the target table, and read-back propagation.
pub trait ColumnSetupProvider {
    /// Ordered column list; identical on every call.
    fn build(&self) -> &[ColumnSetup];

    fn table_name(&self) -> BulkResult<&str>;

    fn schema_name(&self) -> BulkResult<Option<&str>>;

    /// Push read-back values, keyed by column name, into `row`.
    fn propagate_values<R: RowCommand>(
        &self,
        row: &mut R,
        values: &HashMap<String, Value>,
    ) -> BulkResult<()>;
}

impl ColumnSetupProvider for ColumnSetupBuilder {
    fn build(&self) -> &[ColumnSetup] {
        ColumnSetupBuilder::build(self)
    }

    fn table_name(&self) -> BulkResult<&str> {
        ColumnSetupBuilder::table_name(self)
    }

    fn schema_name(&self) -> BulkResult<Option<&str>> {
        ColumnSetupBuilder::schema_name(self)
    }

    fn propagate_values<R: RowCommand>(
        &self,
        row: &mut R,
        values: &HashMap<String, Value>,
    ) -> BulkResult<()> {
        ColumnSetupBuilder::propagate_values(self, row, values)
    }
}
