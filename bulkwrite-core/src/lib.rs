//! bulkwrite Core - Value and Direction Types
//!
//! Pure data types shared by the column setup builder and the row-command
//! implementations that feed it. This crate carries no builder logic.

mod config;
mod convert;
mod enums;
mod error;
mod table;
mod value;

pub use config::*;
pub use convert::*;
pub use enums::*;
pub use error::*;
pub use table::*;
pub use value::*;

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
