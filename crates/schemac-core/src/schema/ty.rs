use serde::{Deserialize, Serialize};
use std::fmt;

/// A column type.
///
/// Primitive keywords are recognized through a fixed table; there is no
/// inference beyond it. Anything else is a reference to a declared enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Type {
    Id,
    Text,
    Date,
    Time,
    Timestamp,
    Integer,
    Float,
    Boolean,
    Binary,
    Json,
    Array(Box<Type>),
    Enum(String),
}

impl Type {
    /// Looks up a primitive type keyword, case-insensitively.
    ///
    /// Returns `None` for anything that is not in the keyword table.
    pub fn primitive(token: &str) -> Option<Type> {
        if let Some(element) = token.strip_suffix("[]") {
            return Type::primitive(element).map(|ty| Type::Array(Box::new(ty)));
        }

        let ty = match token.to_ascii_uppercase().as_str() {
            "UUID" | "ID" => Type::Id,
            "TEXT" | "STRING" | "VARCHAR" => Type::Text,
            "DATE" => Type::Date,
            "TIME" => Type::Time,
            "TIMESTAMP" | "DATETIME" => Type::Timestamp,
            "INTEGER" | "INT" => Type::Integer,
            "FLOAT" | "DOUBLE" | "REAL" => Type::Float,
            "BOOLEAN" | "BOOL" => Type::Boolean,
            "BYTEA" | "BINARY" | "BLOB" => Type::Binary,
            "JSON" | "JSONB" => Type::Json,
            _ => return None,
        };

        Some(ty)
    }

    /// Parses a type token, treating anything that is not a primitive keyword
    /// as an enum reference.
    pub fn from_token(token: &str) -> Type {
        if let Some(element) = token.strip_suffix("[]") {
            return Type::Array(Box::new(Type::from_token(element)));
        }

        Type::primitive(token).unwrap_or_else(|| Type::Enum(token.into()))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Type::Enum(_))
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Type::Enum(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Id => f.write_str("UUID"),
            Type::Text => f.write_str("TEXT"),
            Type::Date => f.write_str("DATE"),
            Type::Time => f.write_str("TIME"),
            Type::Timestamp => f.write_str("TIMESTAMP"),
            Type::Integer => f.write_str("INTEGER"),
            Type::Float => f.write_str("FLOAT"),
            Type::Boolean => f.write_str("BOOLEAN"),
            Type::Binary => f.write_str("BYTEA"),
            Type::Json => f.write_str("JSON"),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Enum(name) => f.write_str(name),
        }
    }
}

impl From<String> for Type {
    fn from(value: String) -> Self {
        Type::from_token(&value)
    }
}

impl From<Type> for String {
    fn from(value: Type) -> Self {
        value.to_string()
    }
}
