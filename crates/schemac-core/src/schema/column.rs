use super::{Name, Type};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Name of the column as written in the schema
    pub name: String,

    pub ty: Type,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

/// A normalized column modifier.
///
/// `[primary key]`, `[PRIMARY_KEY]` and a bare `primary key` all normalize
/// to [`Modifier::PrimaryKey`]. Unrecognized modifiers are kept in their
/// normalized spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Modifier {
    PrimaryKey,
    Hidden,
    Unique,

    /// The column's type names a declared enum.
    Enum,

    Other(String),
}

impl Column {
    pub fn is_primary_key(&self) -> bool {
        self.has(&Modifier::PrimaryKey)
    }

    /// Hidden columns are stored but never serialized to clients.
    pub fn is_hidden(&self) -> bool {
        self.has(&Modifier::Hidden)
    }

    pub fn is_unique(&self) -> bool {
        self.has(&Modifier::Unique)
    }

    pub fn has(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    pub fn name(&self) -> Name {
        Name::new(&self.name)
    }

    /// The column name with leading underscores removed, as used for
    /// serialized field names.
    pub fn field_name(&self) -> &str {
        self.name.trim_start_matches('_')
    }
}

impl Modifier {
    /// Normalizes a raw modifier: brackets dropped, lowercased, `_` and `-`
    /// read as spaces, whitespace collapsed.
    pub fn normalize(raw: &str) -> String {
        raw.trim_matches(|c| c == '[' || c == ']')
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn parse(raw: &str) -> Modifier {
        let normalized = Modifier::normalize(raw);

        match normalized.as_str() {
            "primary key" | "primary" | "pk" => Modifier::PrimaryKey,
            "hidden" => Modifier::Hidden,
            "unique" => Modifier::Unique,
            "enum" => Modifier::Enum,
            _ => Modifier::Other(normalized),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::PrimaryKey => f.write_str("primary key"),
            Modifier::Hidden => f.write_str("hidden"),
            Modifier::Unique => f.write_str("unique"),
            Modifier::Enum => f.write_str("enum"),
            Modifier::Other(other) => f.write_str(other),
        }
    }
}

impl From<String> for Modifier {
    fn from(value: String) -> Self {
        Modifier::parse(&value)
    }
}

impl From<Modifier> for String {
    fn from(value: Modifier) -> Self {
        value.to_string()
    }
}
