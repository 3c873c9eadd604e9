use super::{Column, Name};

use serde::{Deserialize, Serialize};

/// A table declared with a `Table` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Name of the table, unique within the schema
    pub name: String,

    /// The table's columns, in declaration order
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// The table's primary key column. A table has at most one.
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|column| column.is_primary_key())
    }

    /// Columns that are serialized outward, i.e. not hidden.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().filter(|column| !column.is_hidden())
    }

    pub fn name(&self) -> Name {
        Name::new(&self.name)
    }
}
