//! Row-command capability traits.
//!
//! The builder never narrows a row command to a concrete type. Anything that
//! can report its table, lifecycle state and ordered column modifications,
//! and accept a positional read-back buffer, can take part in a batch.

use bulkwrite_core::{BulkResult, EntityState, Value, ValueBuffer, ValueConverter, ValueType};

/// One column's participation in one row change command.
pub trait ColumnModification {
    /// Column name; the join key across row commands.
    fn column_name(&self) -> &str;

    fn is_key(&self) -> bool;

    /// The data engine must receive a value for this column.
    fn is_write(&self) -> bool;

    /// The data engine produces a value for this column that must be read back.
    fn is_read(&self) -> bool;

    /// Send the original (pre-change) value, e.g. a key used to locate the row.
    fn use_original_value(&self) -> bool;

    /// Send the current value.
    fn use_current_value(&self) -> bool;

    fn value_type(&self) -> ValueType;

    /// Converter applied to every outgoing value of this column.
    fn converter(&self) -> Option<&dyn ValueConverter>;

    fn current_value(&self) -> &Value;

    fn original_value(&self) -> &Value;

    /// Value sent when neither the current nor the original value is flagged.
    fn default_value(&self) -> Value {
        self.value_type().default_value()
    }
}

/// One row's pending insert, update or delete.
pub trait RowCommand {
    type Modification: ColumnModification;

    fn table_name(&self) -> &str;

    fn schema(&self) -> Option<&str>;

    fn entity_state(&self) -> EntityState;

    /// Column modifications in the row's own order.
    fn column_modifications(&self) -> &[Self::Modification];

    /// Write read-back values into the tracked entity.
    ///
    /// `values` is aligned with this row's read-flagged modifications, in
    /// `column_modifications` order.
    fn propagate_results(&mut self, values: ValueBuffer) -> BulkResult<()>;
}
