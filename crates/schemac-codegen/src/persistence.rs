use crate::fmt::{Comma, Formatter, Lines};
use crate::relation::{self, Relation};
use crate::type_map::{Python, SqlAlchemy, TypeMap};
use crate::{Emitter, EmitterKind, Output};

use indexmap::IndexSet;
use schemac_core::schema::{type_ident, Column, Enum, Name, Schema, Table, Type};
use schemac_core::{Diagnostic, Diagnostics, Result};

const SQL_TYPES: &str = "from sqlalchemy.types import \
    String, Integer, Float, Date, Time, DateTime, Boolean, LargeBinary, JSON";

/// SQLAlchemy ORM classes, one module per table and one per enum.
///
/// Unlike the transfer and client layers, both ends of every relationship
/// are declared: the ORM needs each side to name its `back_populates` peer.
#[derive(Debug, Clone)]
pub struct Persistence {
    /// Package the transfer schemas are generated into
    schemas_package: String,

    /// Declarative base import
    base_import: String,
}

impl Persistence {
    pub fn new() -> Persistence {
        Persistence {
            schemas_package: "app.autogen.schemas".to_string(),
            base_import: "from app.db.base import Base".to_string(),
        }
    }

    pub fn schemas_package(mut self, package: impl Into<String>) -> Self {
        self.schemas_package = package.into();
        self
    }

    pub fn base_import(mut self, import: impl Into<String>) -> Self {
        self.base_import = import.into();
        self
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for Persistence {
    fn kind(&self) -> EmitterKind {
        EmitterKind::Persistence
    }

    fn emit(&self, schema: &Schema) -> Result<Output> {
        let mut output = Output::new();

        for enumeration in schema.enums.values() {
            let path = format!("{}Enum.py", type_ident(&enumeration.name));
            output.push(path, enum_module(enumeration));
        }

        for table in schema.tables.values() {
            let path = format!("{}Model.py", type_ident(&table.name));
            let contents = self.table_module(schema, table, &mut output.diagnostics);
            output.push(path, contents);
        }

        output.push("__init__.py", init_module(schema));

        Ok(output)
    }
}

impl Persistence {
    fn table_module(
        &self,
        schema: &Schema,
        table: &Table,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let mut f = Formatter::new();
        let class = &type_ident(&table.name);

        // Each forward foreign key restated in schema syntax
        for fk in schema.forward_fks(&table.name) {
            fmt!(&mut f, "# " fk.to_string() "\n");
        }

        fmt!(&mut f, Lines([
            "import uuid",
            "import datetime",
            "from sqlalchemy import Column, ForeignKey",
            "from sqlalchemy import Enum as SQLEnum",
            "from sqlalchemy.orm import relationship",
            "from sqlalchemy.dialects.postgresql import UUID, ARRAY",
            SQL_TYPES,
            "from typing import List, Optional, cast",
        ]));
        fmt!(&mut f, self.base_import.as_str() "\n");

        for name in enum_refs(table) {
            let ident = &type_ident(name);
            fmt!(&mut f, "from ." ident.as_str() "Enum import " ident "\n");
        }

        fmt!(&mut f, "\n\nclass " class "(Base):\n");
        fmt!(&mut f, "    __tablename__ = '" table.name.as_str() "'\n\n");

        for column in &table.columns {
            let definition = column_definition(schema, table, column, diagnostics);
            fmt!(&mut f, "    " column.name.as_str() " = " definition "\n");
        }

        let relations = relation::both_ends(schema, &table.name);
        if !relations.is_empty() {
            fmt!(&mut f, "\n");
        }

        for relation in &relations {
            let args = relationship_args(schema, relation);
            fmt!(&mut f, "    " relation.field " = relationship(" Comma(args) ")\n");
        }

        for column in &table.columns {
            let property = &Name::new(&column.name).upper_camel_case();
            let py = &Python.map(&column.ty);

            fmt!(&mut f, "\n    @property\n");
            fmt!(&mut f, "    def " property "(self) -> " py ":\n");
            fmt!(&mut f, "        return cast(" py ", self." column.name.as_str() ")\n\n");
            fmt!(&mut f, "    @" property ".setter\n");
            fmt!(&mut f, "    def " property "(self, value: Optional[" py "]) -> None:\n");
            fmt!(&mut f, "        self." column.name.as_str() " = value\n");
        }

        fmt!(&mut f, "\n    def to_schema(self):\n");
        let package = self.schemas_package.as_str();
        fmt!(&mut f, "        from " package "." class.as_str() "Schema import " class "Schema\n");
        fmt!(&mut f, "        return " class "Schema.model_validate(self)\n\n");
        fmt!(&mut f, "    def to_dict(self):\n");
        fmt!(&mut f, "        return self.to_schema().model_dump(by_alias=False)\n");

        f.finish()
    }
}

fn column_definition(
    schema: &Schema,
    table: &Table,
    column: &Column,
    diagnostics: &mut Diagnostics,
) -> String {
    let mut args = vec![SqlAlchemy.map(&column.ty)];

    // A column may carry more than one foreign key; the first one wins, as the
    // ORM accepts only one per column.
    let fk = schema
        .forward_fks(&table.name)
        .iter()
        .find(|fk| fk.source_column == column.name);

    if let Some(fk) = fk {
        let mut target = format!("ForeignKey(\"{}\"", fk.target_path());
        if schema.is_deferred(fk) {
            target.push_str(", use_alter=True");
        }
        target.push(')');
        args.push(target);
    }

    if column.is_primary_key() {
        args.push("primary_key=True".to_string());
        if column.ty == Type::Id {
            args.push("default=uuid.uuid4".to_string());
        }
    }

    if column.is_unique() {
        args.push("unique=True".to_string());
    }

    if let Type::Enum(name) = &column.ty {
        args.push("nullable=False".to_string());

        if let Some(default) = enum_default(schema, name, &table.name, column, diagnostics) {
            args.push(format!("default={}.{}", type_ident(name), default));
        }
    }

    format!("Column({})", args.join(", "))
}

/// The default member for an enum column. A missing default is reported and
/// the column is emitted without one.
fn enum_default(
    schema: &Schema,
    name: &str,
    table: &str,
    column: &Column,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    let enumeration = schema.enumeration(name)?;

    match enumeration.default_member() {
        Ok(member) => Some(member.member().to_string()),
        Err(err) => {
            diagnostics.push(Diagnostic::defaulted(
                format!("{table}.{}", column.name),
                format!("{err}; column emitted without a default"),
            ));
            None
        }
    }
}

fn relationship_args(schema: &Schema, relation: &Relation<'_>) -> Vec<String> {
    let fk = relation.fk;

    let uselist = if relation.is_many() { "True" } else { "False" };
    let mut args = vec![
        format!("'{}'", relation.peer_type()),
        format!("uselist={uselist}"),
        format!("back_populates='{}'", relation.back),
    ];

    // Several foreign keys between the same pair of tables, or a table
    // referring to itself, leave the join ambiguous.
    let parallel = schema
        .forward_fks(&fk.source_table)
        .iter()
        .filter(|other| other.target_table == fk.target_table)
        .count();

    if parallel > 1 || fk.is_self_referential() {
        if relation.owning {
            args.push(format!("foreign_keys=[{}]", fk.source_column));
        } else {
            args.push(format!(
                "foreign_keys='{}.{}'",
                type_ident(&fk.source_table),
                fk.source_column
            ));
        }
    }

    if fk.is_self_referential() && relation.owning && !relation.is_many() {
        args.push(format!("remote_side=[{}]", fk.target_column));
    }

    args
}

/// Enums referenced by the table's columns, in column order
fn enum_refs(table: &Table) -> IndexSet<&str> {
    table
        .columns
        .iter()
        .filter_map(|column| match &column.ty {
            Type::Enum(name) => Some(name.as_str()),
            Type::Array(element) => element.as_enum(),
            _ => None,
        })
        .collect()
}

fn enum_module(enumeration: &Enum) -> String {
    let mut f = Formatter::new();
    let class = &type_ident(&enumeration.name);

    fmt!(&mut f, "from enum import Enum\n\n\n");
    fmt!(&mut f, "class " class "(str, Enum):\n");

    if enumeration.values.is_empty() {
        fmt!(&mut f, "    pass\n");
    }

    for value in &enumeration.values {
        fmt!(&mut f, "    " value.member() " = '" value.value.as_str() "'\n");
    }

    f.finish()
}

fn init_module(schema: &Schema) -> String {
    let mut f = Formatter::new();

    for enumeration in schema.enums.values() {
        let ident = &type_ident(&enumeration.name);
        fmt!(&mut f, "from ." ident.as_str() "Enum import " ident "\n");
    }

    for table in schema.tables.values() {
        let ident = &type_ident(&table.name);
        fmt!(&mut f, "from ." ident.as_str() "Model import " ident "\n");
    }

    f.finish()
}
