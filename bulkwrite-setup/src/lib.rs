//! bulkwrite Setup - Column Setup Builder
//!
//! Turns a batch of heterogeneous row change commands destined for one table
//! into a flat, column-oriented plan for a set-based bulk operation, and
//! pushes database-produced values back into the originating row commands
//! once the operation has run.
//!
//! Row commands are consumed through the [`RowCommand`] and
//! [`ColumnModification`] capability traits; the physical transfer of value
//! buffers is left to the caller.

mod builder;
mod column;
mod command;
mod direction;
mod provider;

pub use builder::ColumnSetupBuilder;
pub use column::{ColumnSetup, ValueExtractor};
pub use command::{ColumnModification, RowCommand};
pub use direction::compute_direction;
pub use provider::ColumnSetupProvider;

// Re-export core types for convenience
pub use bulkwrite_core::{
    BulkError, BulkResult, EntityState, MissingValuePolicy, PropagationError, SetupConfig,
    SetupError, TableRef, Value, ValueBuffer, ValueConverter, ValueDirection, ValueKind, ValueType,
};
