//! Batch-wide direction rule for a column.

use crate::ColumnModification;
use bulkwrite_core::{EntityState, ValueDirection};

/// Compute the direction of one column from every modification sharing its
/// name across the batch, each paired with the state of its row.
///
/// A key modification on a deleted row pins the direction to exactly
/// `WRITE`; read flags elsewhere in the batch are not merged in that case.
/// Otherwise the result is the union of the write and read flags.
pub fn compute_direction<M: ColumnModification>(
    modifications: &[(EntityState, &M)],
) -> ValueDirection {
    let deleted_key = modifications
        .iter()
        .any(|(state, m)| state.is_deleted() && m.is_key());

    if deleted_key {
        return ValueDirection::WRITE;
    }

    let mut direction = ValueDirection::NONE;

    if modifications.iter().any(|(_, m)| m.is_write()) {
        direction |= ValueDirection::WRITE;
    }

    if modifications.iter().any(|(_, m)| m.is_read()) {
        direction |= ValueDirection::READ;
    }

    direction
}
