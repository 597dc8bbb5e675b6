//! Read-back propagation tests.

use bulkwrite_setup::{ColumnSetupBuilder, ColumnSetupProvider};
use bulkwrite_test_utils::*;
use std::collections::HashMap;

fn read_back(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn test_scenario_d_single_read_column() {
    let mut batch = vec![MockRowCommand::insert(
        "People",
        vec![identity_column(), text_column("Name", "a")],
    )];
    let builder = ColumnSetupBuilder::new(&batch).unwrap();

    builder
        .propagate_values(&mut batch[0], &read_back(&[("Id", Value::Int(42))]))
        .unwrap();

    assert_eq!(
        batch[0].last_propagated(),
        Some(&ValueBuffer::new(vec![Value::Int(42)]))
    );
    assert_eq!(
        batch[0].modification("Id").unwrap().current_value,
        Value::Int(42)
    );
}

#[test]
fn test_buffer_follows_row_order_not_column_order() {
    // Column order is Id, BoolFlag, Description_de, State from the first row;
    // the second row lists State before Id.
    let reordered = MockRowCommand::insert(
        TABLE_WITH_SHADOW_PROPERTY,
        vec![
            MockColumnModification::new("State", ValueType::new(ValueKind::Int32)).read(),
            text_column("Description_de", "b"),
            identity_column(),
        ],
    );
    let mut batch = vec![table_with_shadow_property_insert("a"), reordered];
    let builder = ColumnSetupBuilder::new(&batch).unwrap();

    let values = read_back(&[
        ("Id", Value::Int(11)),
        ("BoolFlag", Value::Bool(false)),
        ("State", Value::Int(2)),
    ]);
    builder.propagate_values(&mut batch[1], &values).unwrap();

    assert_eq!(
        batch[1].last_propagated(),
        Some(&ValueBuffer::new(vec![Value::Int(2), Value::Int(11)]))
    );
}

#[test]
fn test_non_read_columns_excluded_from_buffer() {
    let mut batch = vec![simple_table_with_identity_insert("a")];
    let builder = ColumnSetupBuilder::new(&batch).unwrap();

    let values = read_back(&[
        ("Id", Value::Int(5)),
        ("Title", Value::from("server-side")),
        ("CreateTime", Value::Timestamp(fixed_timestamp())),
    ]);
    builder.propagate_values(&mut batch[0], &values).unwrap();

    let buffer = batch[0].last_propagated().unwrap();
    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.get(0), Some(&Value::Int(5)));
    // Written column untouched
    assert_eq!(
        batch[0].modification("Title").unwrap().current_value,
        Value::from("a")
    );
}

#[test]
fn test_row_without_reads_gets_empty_buffer() {
    let mut batch = vec![simple_table_with_identity_update(3, "b")];
    let builder = ColumnSetupBuilder::new(&batch).unwrap();

    builder
        .propagate_values(&mut batch[0], &HashMap::new())
        .unwrap();

    assert_eq!(batch[0].last_propagated(), Some(&ValueBuffer::default()));
}

#[test]
fn test_missing_read_value_fails_by_default() {
    let mut batch = vec![table_with_shadow_property_insert("a")];
    let builder = ColumnSetupBuilder::new(&batch).unwrap();

    let err = builder
        .propagate_values(
            &mut batch[0],
            &read_back(&[("Id", Value::Int(1)), ("State", Value::Int(2))]),
        )
        .unwrap_err();

    assert_eq!(
        err,
        BulkError::Propagation(PropagationError::MissingReadValue {
            column: "BoolFlag".to_string(),
        })
    );
    assert!(batch[0].propagated.is_empty(), "no partial propagation");
}

#[test]
fn test_missing_read_value_null_policy_substitutes() {
    let mut batch = vec![table_with_shadow_property_insert("a")];
    let config = SetupConfig {
        missing_read_value: bulkwrite_core::MissingValuePolicy::Null,
        ..SetupConfig::default()
    };
    let builder = ColumnSetupBuilder::with_config(&batch, &config).unwrap();

    builder
        .propagate_values(&mut batch[0], &read_back(&[("Id", Value::Int(1))]))
        .unwrap();

    assert_eq!(
        batch[0].last_propagated(),
        Some(&ValueBuffer::new(vec![Value::Int(1), Value::Null, Value::Null]))
    );
}

#[test]
fn test_row_rejection_is_surfaced() {
    let mut batch = vec![simple_table_with_identity_insert("a").rejecting("entity detached")];
    let builder = ColumnSetupBuilder::new(&batch).unwrap();

    let err = builder
        .propagate_values(&mut batch[0], &read_back(&[("Id", Value::Int(1))]))
        .unwrap_err();

    assert_eq!(
        err,
        BulkError::Propagation(PropagationError::RowRejected {
            reason: "entity detached".to_string(),
        })
    );
}

#[test]
fn test_propagation_through_provider_trait() {
    fn run<P: ColumnSetupProvider>(
        provider: &P,
        row: &mut MockRowCommand,
        values: &HashMap<String, Value>,
    ) -> BulkResult<()> {
        provider.table_name()?;
        provider.propagate_values(row, values)
    }

    let mut batch = vec![
        simple_table_with_identity_insert("a"),
        simple_table_with_identity_insert("b"),
    ];
    let builder = ColumnSetupBuilder::new(&batch).unwrap();

    for (i, row) in batch.iter_mut().enumerate() {
        let id = Value::Int(100 + i as i64);
        run(&builder, row, &read_back(&[("Id", id.clone())])).unwrap();
        assert_eq!(row.modification("Id").unwrap().current_value, id);
    }
}
