//! Qualified table identity shared by every row command in a batch

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table name plus optional schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    pub schema: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>, schema: Option<&str>) -> Self {
        Self {
            name: name.into(),
            schema: schema.map(str::to_string),
        }
    }

    /// True when `name`/`schema` identify this same table.
    pub fn matches(&self, name: &str, schema: Option<&str>) -> bool {
        self.name == name && self.schema.as_deref() == schema
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_schema() {
        assert_eq!(TableRef::new("Orders", Some("dbo")).to_string(), "dbo.Orders");
        assert_eq!(TableRef::new("Orders", None).to_string(), "Orders");
    }

    #[test]
    fn test_matches_compares_schema() {
        let table = TableRef::new("Orders", Some("dbo"));
        assert!(table.matches("Orders", Some("dbo")));
        assert!(!table.matches("Orders", None));
        assert!(!table.matches("Customers", Some("dbo")));
    }
}
