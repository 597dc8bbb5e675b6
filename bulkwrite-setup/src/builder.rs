//! Column setup builder.
//!
//! Flattens a batch of row change commands into one ordered, column-oriented
//! plan for a set-based bulk operation, then reverses the flattening when
//! read-back values come back from the data engine.
//!
//! # Flow
//!
//! 1. [`ColumnSetupBuilder::new`] groups every column modification in the
//!    batch by column name, in first-seen order, and derives one
//!    [`ColumnSetup`] per group.
//! 2. [`ColumnSetupBuilder::build`] hands out the ordered column list.
//! 3. The orchestrator fills one outgoing buffer per row via
//!    [`ColumnSetup::extract`] or [`ColumnSetupBuilder::row_values`].
//! 4. After the bulk operation, [`ColumnSetupBuilder::propagate_values`]
//!    pushes read-back values into each row command.

use crate::{compute_direction, ColumnModification, ColumnSetup, RowCommand};
use bulkwrite_core::{
    BulkResult, EntityState, MissingValuePolicy, PropagationError, SetupConfig, SetupError,
    TableRef, Value, ValueBuffer, ValueDirection,
};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Modifications sharing one column name, paired with their row state.
struct ColumnGroup<'a, M> {
    column_name: &'a str,
    first_row: usize,
    members: Vec<(EntityState, &'a M)>,
}

/// Derives the column list for a batch and propagates read-back values.
///
/// Immutable once constructed; safe to share across threads for concurrent
/// extraction.
#[derive(Debug, Clone)]
pub struct ColumnSetupBuilder {
    table: Option<TableRef>,
    columns: Vec<ColumnSetup>,
    by_name: HashMap<String, usize>,
    config: SetupConfig,
}

impl ColumnSetupBuilder {
    /// Build with the default (strict) configuration.
    pub fn new<R: RowCommand>(commands: &[R]) -> BulkResult<Self> {
        Self::with_config(commands, &SetupConfig::default())
    }

    /// Build the column setup for `commands`.
    ///
    /// An empty batch (or one where no row touches any column) is accepted;
    /// the table accessors then report `SetupError::EmptyBatch`.
    ///
    /// # Errors
    ///
    /// - `ConfigError` when `config` is invalid.
    /// - `SetupError::MixedTables` when `validate_table_consistency` is on and
    ///   a row command targets a different table or schema than the batch.
    pub fn with_config<R: RowCommand>(commands: &[R], config: &SetupConfig) -> BulkResult<Self> {
        config.validate()?;

        let groups = group_by_column(commands, config.expected_columns.unwrap_or(0));

        // The first group's first row is the first row with any modification.
        let table = groups.first().map(|group| {
            let command = &commands[group.first_row];
            TableRef::new(command.table_name(), command.schema())
        });

        if config.validate_table_consistency {
            if let Some(table) = &table {
                check_single_table(table, commands)?;
            }
        }

        let mut columns = Vec::with_capacity(groups.len());
        let mut by_name = HashMap::with_capacity(groups.len());

        for group in &groups {
            let ordinal = columns.len();
            let direction = compute_direction(&group.members);
            let value_type = group.members[0].1.value_type();

            trace!(
                column = group.column_name,
                ordinal,
                %direction,
                %value_type,
                modifications = group.members.len(),
                "Column setup derived"
            );

            by_name.insert(group.column_name.to_string(), ordinal);
            columns.push(ColumnSetup::new(
                ordinal,
                group.column_name,
                value_type,
                direction,
            ));
        }

        match &table {
            Some(table) => debug!(
                table = %table,
                rows = commands.len(),
                columns = columns.len(),
                "Built column setup"
            ),
            None => debug!(rows = commands.len(), "Built column setup from empty batch"),
        }

        Ok(Self {
            table,
            columns,
            by_name,
            config: config.clone(),
        })
    }

    /// Ordered column list. Returns the same list on every call.
    pub fn build(&self) -> &[ColumnSetup] {
        &self.columns
    }

    /// Table shared by every row command in the batch.
    pub fn table(&self) -> BulkResult<&TableRef> {
        self.table.as_ref().ok_or_else(|| SetupError::EmptyBatch.into())
    }

    pub fn table_name(&self) -> BulkResult<&str> {
        self.table().map(|t| t.name.as_str())
    }

    pub fn schema_name(&self) -> BulkResult<Option<&str>> {
        self.table().map(|t| t.schema.as_deref())
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSetup> {
        self.by_name.get(name).map(|&ordinal| &self.columns[ordinal])
    }

    /// Columns whose direction contains every flag in `direction`.
    ///
    /// `ValueDirection::NONE` matches every column.
    pub fn columns_with(
        &self,
        direction: ValueDirection,
    ) -> impl Iterator<Item = &ColumnSetup> + '_ {
        self.columns
            .iter()
            .filter(move |c| c.direction().contains(direction))
    }

    /// Outgoing values for one row in column order.
    ///
    /// Columns the row does not touch are `Value::Null`.
    pub fn row_values<R: RowCommand>(&self, row: &R) -> BulkResult<Vec<Value>> {
        self.columns
            .iter()
            .map(|column| column.extract(row).map(Option::unwrap_or_default))
            .collect()
    }

    /// Push read-back values into `row`.
    ///
    /// `values` is keyed by column name. The buffer handed to
    /// [`RowCommand::propagate_results`] holds exactly one value per
    /// read-flagged modification of `row`, in the row's own modification
    /// order.
    ///
    /// # Errors
    ///
    /// - `PropagationError::MissingReadValue` when a read column has no entry
    ///   in `values` and the policy is `MissingValuePolicy::Fail`.
    /// - Whatever the row command returns from `propagate_results`.
    pub fn propagate_values<R: RowCommand>(
        &self,
        row: &mut R,
        values: &HashMap<String, Value>,
    ) -> BulkResult<()> {
        let mut buffer = Vec::new();

        for modification in row.column_modifications().iter().filter(|m| m.is_read()) {
            let column = modification.column_name();
            match values.get(column) {
                Some(value) => buffer.push(value.clone()),
                None => match self.config.missing_read_value {
                    MissingValuePolicy::Fail => {
                        return Err(PropagationError::MissingReadValue {
                            column: column.to_string(),
                        }
                        .into());
                    }
                    MissingValuePolicy::Null => {
                        warn!(column, "Missing read-back value, substituting NULL");
                        buffer.push(Value::Null);
                    }
                },
            }
        }

        debug!(arity = buffer.len(), "Propagating read-back values");
        row.propagate_results(ValueBuffer::new(buffer))
    }
}

/// Group every (row, modification) pair by column name, keeping first-seen
/// column order.
fn group_by_column<R: RowCommand>(
    commands: &[R],
    capacity: usize,
) -> Vec<ColumnGroup<'_, R::Modification>> {
    let mut groups: Vec<ColumnGroup<'_, R::Modification>> = Vec::with_capacity(capacity);
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(capacity);

    for (row, command) in commands.iter().enumerate() {
        let state = command.entity_state();
        for modification in command.column_modifications() {
            let column_name = modification.column_name();
            let slot = *slots.entry(column_name).or_insert_with(|| {
                groups.push(ColumnGroup {
                    column_name,
                    first_row: row,
                    members: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].members.push((state, modification));
        }
    }

    groups
}

fn check_single_table<R: RowCommand>(table: &TableRef, commands: &[R]) -> BulkResult<()> {
    for (row, command) in commands.iter().enumerate() {
        if !table.matches(command.table_name(), command.schema()) {
            return Err(SetupError::MixedTables {
                expected: table.to_string(),
                found: TableRef::new(command.table_name(), command.schema()).to_string(),
                row,
            }
            .into());
        }
    }
    Ok(())
}
