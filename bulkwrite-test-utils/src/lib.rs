//! bulkwrite Test Utilities
//!
//! Centralized test infrastructure for the bulkwrite workspace:
//! - In-memory row command and column modification implementations
//! - Fixtures for the tables used across the scenario tests
//! - Proptest generators for arbitrary batches
//! - Custom assertions for column list invariants

use std::sync::Arc;

// Re-export core types for convenience
pub use bulkwrite_core::{
    BoolToNumberConverter, BulkError, BulkResult, EntityState, EnumToStringConverter,
    PropagationError, SetupConfig, SetupError, Timestamp, Value, ValueBuffer, ValueConverter,
    ValueDirection, ValueKind, ValueType,
};
pub use bulkwrite_setup::{ColumnModification, ColumnSetup, ColumnSetupBuilder, RowCommand};

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

// ============================================================================
// MOCK COLUMN MODIFICATION
// ============================================================================

/// In-memory column modification with builder-style flag setters.
#[derive(Debug, Clone)]
pub struct MockColumnModification {
    pub column_name: String,
    pub is_key: bool,
    pub is_read: bool,
    pub is_write: bool,
    pub use_original_value: bool,
    pub use_current_value: bool,
    pub value_type: ValueType,
    pub converter: Option<Arc<dyn ValueConverter>>,
    pub current_value: Value,
    pub original_value: Value,
}

impl MockColumnModification {
    /// A modification with every flag off and both values `Null`.
    pub fn new(column_name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            column_name: column_name.into(),
            is_key: false,
            is_read: false,
            is_write: false,
            use_original_value: false,
            use_current_value: false,
            value_type,
            converter: None,
            current_value: Value::Null,
            original_value: Value::Null,
        }
    }

    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn read(mut self) -> Self {
        self.is_read = true;
        self
    }

    pub fn write(mut self) -> Self {
        self.is_write = true;
        self
    }

    /// Set the current value and flag it for sending.
    pub fn current(mut self, value: impl Into<Value>) -> Self {
        self.current_value = value.into();
        self.use_current_value = true;
        self
    }

    /// Set the original value and flag it for sending.
    pub fn original(mut self, value: impl Into<Value>) -> Self {
        self.original_value = value.into();
        self.use_original_value = true;
        self
    }

    pub fn with_converter(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }
}

impl ColumnModification for MockColumnModification {
    fn column_name(&self) -> &str {
        &self.column_name
    }

    fn is_key(&self) -> bool {
        self.is_key
    }

    fn is_write(&self) -> bool {
        self.is_write
    }

    fn is_read(&self) -> bool {
        self.is_read
    }

    fn use_original_value(&self) -> bool {
        self.use_original_value
    }

    fn use_current_value(&self) -> bool {
        self.use_current_value
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn converter(&self) -> Option<&dyn ValueConverter> {
        self.converter.as_deref()
    }

    fn current_value(&self) -> &Value {
        &self.current_value
    }

    fn original_value(&self) -> &Value {
        &self.original_value
    }
}

// ============================================================================
// MOCK ROW COMMAND
// ============================================================================

/// In-memory row command that records every buffer it receives.
///
/// Accepted buffers are also applied positionally to the current value of
/// each read-flagged modification, standing in for entity state updates.
#[derive(Debug, Clone)]
pub struct MockRowCommand {
    pub table_name: String,
    pub schema: Option<String>,
    pub state: EntityState,
    pub modifications: Vec<MockColumnModification>,
    pub propagated: Vec<ValueBuffer>,
    pub reject_with: Option<String>,
}

impl MockRowCommand {
    pub fn new(
        table_name: impl Into<String>,
        state: EntityState,
        modifications: Vec<MockColumnModification>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            schema: None,
            state,
            modifications,
            propagated: Vec::new(),
            reject_with: None,
        }
    }

    pub fn insert(table_name: impl Into<String>, modifications: Vec<MockColumnModification>) -> Self {
        Self::new(table_name, EntityState::Added, modifications)
    }

    pub fn update(table_name: impl Into<String>, modifications: Vec<MockColumnModification>) -> Self {
        Self::new(table_name, EntityState::Modified, modifications)
    }

    pub fn delete(table_name: impl Into<String>, modifications: Vec<MockColumnModification>) -> Self {
        Self::new(table_name, EntityState::Deleted, modifications)
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Make `propagate_results` fail with `PropagationError::RowRejected`.
    pub fn rejecting(mut self, reason: impl Into<String>) -> Self {
        self.reject_with = Some(reason.into());
        self
    }

    /// Most recent buffer received, if any.
    pub fn last_propagated(&self) -> Option<&ValueBuffer> {
        self.propagated.last()
    }

    pub fn read_count(&self) -> usize {
        self.modifications.iter().filter(|m| m.is_read).count()
    }

    pub fn modification(&self, column_name: &str) -> Option<&MockColumnModification> {
        self.modifications
            .iter()
            .find(|m| m.column_name == column_name)
    }
}

impl RowCommand for MockRowCommand {
    type Modification = MockColumnModification;

    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    fn entity_state(&self) -> EntityState {
        self.state
    }

    fn column_modifications(&self) -> &[MockColumnModification] {
        &self.modifications
    }

    fn propagate_results(&mut self, values: ValueBuffer) -> BulkResult<()> {
        if let Some(reason) = &self.reject_with {
            return Err(PropagationError::RowRejected {
                reason: reason.clone(),
            }
            .into());
        }

        if values.len() != self.read_count() {
            return Err(PropagationError::RowRejected {
                reason: format!(
                    "expected {} values, got {}",
                    self.read_count(),
                    values.len()
                ),
            }
            .into());
        }

        let reads = self.modifications.iter_mut().filter(|m| m.is_read);
        for (modification, value) in reads.zip(values.iter()) {
            modification.current_value = value.clone();
        }

        self.propagated.push(values);
        Ok(())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub const SIMPLE_TABLE_WITH_IDENTITY: &str = "SimpleTableWithIdentity";
pub const BASE_TPH_TABLE: &str = "BaseTphTable";
pub const TABLE_WITH_SHADOW_PROPERTY: &str = "SimpleTableWithShadowProperty";

/// Fixed timestamp for deterministic fixtures.
pub fn fixed_timestamp() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or(Timestamp::UNIX_EPOCH)
}

/// Identity key generated by the data engine on insert.
pub fn identity_column() -> MockColumnModification {
    MockColumnModification::new("Id", ValueType::new(ValueKind::Int32))
        .key()
        .read()
}

/// Key used to locate an existing row (update/delete condition).
pub fn key_condition(id: i64) -> MockColumnModification {
    MockColumnModification::new("Id", ValueType::new(ValueKind::Int32))
        .key()
        .original(id)
}

pub fn text_column(name: &str, value: &str) -> MockColumnModification {
    MockColumnModification::new(name, ValueType::new(ValueKind::Text))
        .write()
        .current(value)
}

/// Insert into `SimpleTableWithIdentity` (identity Id, audit timestamps).
pub fn simple_table_with_identity_insert(title: &str) -> MockRowCommand {
    let now = fixed_timestamp();
    MockRowCommand::insert(
        SIMPLE_TABLE_WITH_IDENTITY,
        vec![
            identity_column(),
            MockColumnModification::new("CreateTime", ValueType::new(ValueKind::Timestamp))
                .write()
                .current(now),
            MockColumnModification::new("ModifyTime", ValueType::new(ValueKind::Timestamp))
                .write()
                .current(now),
            text_column("Title", title),
            MockColumnModification::new("Whatever", ValueType::new(ValueKind::Text)).write(),
        ],
    )
    .with_schema("dbo")
}

/// Update of `Title` on an existing `SimpleTableWithIdentity` row.
pub fn simple_table_with_identity_update(id: i64, title: &str) -> MockRowCommand {
    MockRowCommand::update(
        SIMPLE_TABLE_WITH_IDENTITY,
        vec![key_condition(id), text_column("Title", title)],
    )
    .with_schema("dbo")
}

/// Delete of an existing `SimpleTableWithIdentity` row.
pub fn simple_table_with_identity_delete(id: i64) -> MockRowCommand {
    MockRowCommand::delete(SIMPLE_TABLE_WITH_IDENTITY, vec![key_condition(id)]).with_schema("dbo")
}

/// Insert into the hierarchy table; `discriminator` selects the child type
/// and with it the child-specific column.
pub fn base_tph_table_insert(name: &str, discriminator: u8, child_value: i32) -> MockRowCommand {
    let child_column = if discriminator == 1 {
        "ChildOneProperty"
    } else {
        "ChildTwoProperty"
    };

    MockRowCommand::insert(
        BASE_TPH_TABLE,
        vec![
            identity_column(),
            text_column("Name", name),
            MockColumnModification::new("Type", ValueType::new(ValueKind::Byte))
                .write()
                .current(discriminator),
            MockColumnModification::new(child_column, ValueType::new(ValueKind::Int32))
                .write()
                .current(child_value),
        ],
    )
}

/// Insert into the table whose store-generated defaults are read back.
///
/// `BoolFlag` and `State` are left to their database defaults and read
/// back; `Description_de` is written.
pub fn table_with_shadow_property_insert(description: &str) -> MockRowCommand {
    MockRowCommand::insert(
        TABLE_WITH_SHADOW_PROPERTY,
        vec![
            identity_column(),
            MockColumnModification::new("BoolFlag", ValueType::new(ValueKind::Bool))
                .read()
                .with_converter(BoolToNumberConverter),
            text_column("Description_de", description),
            MockColumnModification::new("State", ValueType::new(ValueKind::Int32)).read(),
        ],
    )
}

/// Insert into the shadow-property table with an explicit `BoolFlag`.
pub fn table_with_shadow_property_insert_flagged(description: &str, flag: bool) -> MockRowCommand {
    MockRowCommand::insert(
        TABLE_WITH_SHADOW_PROPERTY,
        vec![
            identity_column(),
            MockColumnModification::new("BoolFlag", ValueType::new(ValueKind::Bool))
                .write()
                .current(flag)
                .with_converter(BoolToNumberConverter),
            text_column("Description_de", description),
            MockColumnModification::new("State", ValueType::new(ValueKind::Int32)).read(),
        ],
    )
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Column pool used by the batch generators. Types are fixed per name.
pub const COLUMN_POOL: [&str; 6] = ["Id", "Name", "Title", "CreateTime", "Flag", "Score"];

pub fn pool_value_type(column_name: &str) -> ValueType {
    match column_name {
        "Id" | "Score" => ValueType::new(ValueKind::Int32),
        "CreateTime" => ValueType::new(ValueKind::Timestamp),
        "Flag" => ValueType::new(ValueKind::Bool),
        _ => ValueType::new(ValueKind::Text),
    }
}

/// Flag combination for one generated modification.
#[derive(Debug, Clone, Copy)]
pub struct ModificationFlags {
    pub key: bool,
    pub read: bool,
    pub write: bool,
    pub use_original: bool,
    pub use_current: bool,
    pub current: i64,
}

pub fn arb_entity_state() -> impl Strategy<Value = EntityState> {
    prop_oneof![
        Just(EntityState::Added),
        Just(EntityState::Modified),
        Just(EntityState::Deleted),
    ]
}

pub fn arb_flags() -> impl Strategy<Value = ModificationFlags> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<i64>(),
    )
        .prop_map(|(key, read, write, use_original, use_current, current)| {
            ModificationFlags {
                key,
                read,
                write,
                use_original,
                use_current,
                current,
            }
        })
}

fn modification_from_flags(column_name: &str, flags: ModificationFlags) -> MockColumnModification {
    let mut m = MockColumnModification::new(column_name, pool_value_type(column_name));
    m.is_key = flags.key;
    m.is_read = flags.read;
    m.is_write = flags.write;
    m.use_original_value = flags.use_original;
    m.use_current_value = flags.use_current;
    m.current_value = Value::Int(flags.current);
    m.original_value = Value::Int(flags.current.wrapping_sub(1));
    m
}

/// One row touching a random, shuffled subset of [`COLUMN_POOL`].
pub fn arb_row(table_name: &'static str) -> impl Strategy<Value = MockRowCommand> {
    (
        arb_entity_state(),
        proptest::sample::subsequence(COLUMN_POOL.to_vec(), 0..=COLUMN_POOL.len()).prop_shuffle(),
    )
        .prop_flat_map(|(state, names)| {
            let n = names.len();
            (
                Just(state),
                Just(names),
                proptest::collection::vec(arb_flags(), n),
            )
        })
        .prop_map(move |(state, names, flags)| {
            let modifications = names
                .iter()
                .zip(flags)
                .map(|(name, f)| modification_from_flags(name, f))
                .collect();
            MockRowCommand::new(table_name, state, modifications)
        })
}

/// A batch of up to `max_rows` rows for one table.
pub fn arb_batch(max_rows: usize) -> impl Strategy<Value = Vec<MockRowCommand>> {
    proptest::collection::vec(arb_row("Generated"), 0..=max_rows)
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Assert ordinals run 0..n in list order and names are unique.
pub fn assert_columns_well_formed(columns: &[ColumnSetup]) {
    let mut seen = std::collections::HashSet::new();
    for (position, column) in columns.iter().enumerate() {
        assert_eq!(
            column.ordinal(),
            position,
            "column {} has ordinal {} at position {}",
            column.column_name(),
            column.ordinal(),
            position
        );
        assert!(
            seen.insert(column.column_name().to_string()),
            "duplicate column {}",
            column.column_name()
        );
    }
}

/// Column names in first-seen order across `commands`.
pub fn first_seen_columns(commands: &[MockRowCommand]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for command in commands {
        for m in &command.modifications {
            if !names.iter().any(|n| n == &m.column_name) {
                names.push(m.column_name.clone());
            }
        }
    }
    names
}
