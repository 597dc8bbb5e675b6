//! Lifecycle state and data-flow direction types

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ENTITY STATE
// ============================================================================

/// Lifecycle state of the entity behind a row change command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityState {
    Detached,
    Unchanged,
    Added,
    Modified,
    Deleted,
}

impl EntityState {
    pub const fn is_deleted(&self) -> bool {
        matches!(self, EntityState::Deleted)
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityState::Detached => "Detached",
            EntityState::Unchanged => "Unchanged",
            EntityState::Added => "Added",
            EntityState::Modified => "Modified",
            EntityState::Deleted => "Deleted",
        };
        f.write_str(s)
    }
}

// ============================================================================
// VALUE DIRECTION
// ============================================================================

bitflags! {
    /// Data-flow direction of a column within a bulk operation.
    ///
    /// The empty set means the column is neither sent nor read back.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValueDirection: u8 {
        /// The data engine produces a value the caller must read back
        const READ = 0b0000_0001;
        /// The value must be sent to the data engine
        const WRITE = 0b0000_0010;
    }
}

impl ValueDirection {
    /// Neither read nor written.
    pub const NONE: Self = Self::empty();

    pub const fn is_read(&self) -> bool {
        self.contains(Self::READ)
    }

    pub const fn is_write(&self) -> bool {
        self.contains(Self::WRITE)
    }
}

impl Default for ValueDirection {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for ValueDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_read(), self.is_write()) {
            (false, false) => f.write_str("None"),
            (true, false) => f.write_str("Read"),
            (false, true) => f.write_str("Write"),
            (true, true) => f.write_str("Read|Write"),
        }
    }
}

// Manual serde implementation for ValueDirection (bitflags 2.x + serde)
impl Serialize for ValueDirection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValueDirection {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Self::from_bits(bits).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid ValueDirection bits: {:#04x}", bits))
        })
    }
}
