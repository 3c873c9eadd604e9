//! Per-target lookup from schema column types to target language types.
//!
//! Each table covers the primitives it knows. Arrays wrap the element's
//! mapping in the target's collection syntax, enum references map to the
//! enum's type identifier, and anything else falls back to the target's
//! string type.

use schemac_core::schema::{type_ident, Name, Type};

pub trait TypeMap {
    /// Mapping for a primitive type, `None` when the table has no entry
    fn primitive(&self, ty: &Type) -> Option<&'static str>;

    /// Wraps an element mapping in the target's collection syntax
    fn array(&self, element: String) -> String;

    /// Mapping for a reference to enum `name`
    fn enumeration(&self, name: &str) -> String {
        type_ident(name)
    }

    fn fallback(&self) -> &'static str;

    fn map(&self, ty: &Type) -> String {
        match ty {
            Type::Array(element) => self.array(self.map(element)),
            Type::Enum(name) => self.enumeration(name),
            _ => self.primitive(ty).unwrap_or(self.fallback()).to_string(),
        }
    }

    /// Maps a declared type token, as used by composite model fields and
    /// protocol methods. Tokens outside the keyword table use the fallback.
    fn map_token(&self, token: &str) -> String {
        match Type::primitive(token) {
            Some(ty) => self.map(&ty),
            None => self.fallback().to_string(),
        }
    }
}

/// SQLAlchemy column types
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlAlchemy;

/// Python annotation types
#[derive(Debug, Clone, Copy, Default)]
pub struct Python;

/// Swift types and default literals
#[derive(Debug, Clone, Copy, Default)]
pub struct Swift;

impl TypeMap for SqlAlchemy {
    fn primitive(&self, ty: &Type) -> Option<&'static str> {
        Some(match ty {
            Type::Id => "UUID(as_uuid=True)",
            Type::Text => "String",
            Type::Date => "Date",
            Type::Time => "Time",
            Type::Timestamp => "DateTime",
            Type::Integer => "Integer",
            Type::Float => "Float",
            Type::Boolean => "Boolean",
            Type::Binary => "LargeBinary",
            Type::Json => "JSON",
            _ => return None,
        })
    }

    fn array(&self, element: String) -> String {
        format!("ARRAY({element})")
    }

    fn enumeration(&self, name: &str) -> String {
        let snake = Name::new(name).snake_case();
        format!("SQLEnum({}, name='{snake}')", type_ident(name))
    }

    fn fallback(&self) -> &'static str {
        "String"
    }
}

impl TypeMap for Python {
    fn primitive(&self, ty: &Type) -> Option<&'static str> {
        Some(match ty {
            Type::Id => "uuid.UUID",
            Type::Text => "str",
            Type::Date => "datetime.date",
            Type::Time => "datetime.time",
            Type::Timestamp => "datetime.datetime",
            Type::Integer => "int",
            Type::Float => "float",
            Type::Boolean => "bool",
            Type::Binary => "bytes",
            Type::Json => "dict",
            _ => return None,
        })
    }

    fn array(&self, element: String) -> String {
        format!("List[{element}]")
    }

    fn fallback(&self) -> &'static str {
        "str"
    }
}

impl TypeMap for Swift {
    fn primitive(&self, ty: &Type) -> Option<&'static str> {
        Some(match ty {
            Type::Id => "UUID",
            Type::Text | Type::Json => "String",
            Type::Date | Type::Time | Type::Timestamp => "Date",
            Type::Integer => "Int",
            Type::Float => "Double",
            Type::Boolean => "Bool",
            Type::Binary => "Data",
            _ => return None,
        })
    }

    fn array(&self, element: String) -> String {
        format!("[{element}]")
    }

    fn fallback(&self) -> &'static str {
        "String"
    }
}

impl Swift {
    /// Literal used to initialize a non-optional property of type `ty`.
    ///
    /// Enum references have no literal here; their default comes from the
    /// enum's default member.
    pub fn default_literal(&self, ty: &Type) -> Option<&'static str> {
        Some(match ty {
            Type::Id => "UUID()",
            Type::Text | Type::Json => "\"\"",
            Type::Date | Type::Time | Type::Timestamp => "Date()",
            Type::Integer => "0",
            Type::Float => "0.0",
            Type::Boolean => "false",
            Type::Binary => "Data()",
            Type::Array(_) => "[]",
            Type::Enum(_) => return None,
        })
    }

    /// Default literal for a declared type token; the fallback type's
    /// literal for tokens outside the keyword table.
    pub fn default_for_token(&self, token: &str) -> &'static str {
        Type::primitive(token)
            .and_then(|ty| self.default_literal(&ty))
            .unwrap_or("\"\"")
    }
}
