use crate::fmt::{Formatter, Lines};
use crate::relation::{self, Relation};
use crate::type_map::{Python, TypeMap};
use crate::{Emitter, EmitterKind, Output};

use indexmap::IndexSet;
use schemac_core::schema::{type_ident, Schema, Table, Type};
use schemac_core::Result;
use std::collections::BTreeSet;

/// Pydantic transfer schemas, one module per table.
///
/// Relationship fields follow the single-side embedding: a foreign key shows
/// up on the source schema when it is `refer_left` and on the target schema
/// when it is `refer_right`, never on both.
#[derive(Debug, Clone)]
pub struct Transfer {
    /// Package the persistence models are generated into
    models_package: String,
}

impl Transfer {
    pub fn new() -> Transfer {
        Transfer {
            models_package: "app.autogen.models".to_string(),
        }
    }

    pub fn models_package(mut self, package: impl Into<String>) -> Self {
        self.models_package = package.into();
        self
    }
}

impl Default for Transfer {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for Transfer {
    fn kind(&self) -> EmitterKind {
        EmitterKind::Transfer
    }

    fn emit(&self, schema: &Schema) -> Result<Output> {
        let mut output = Output::new();

        for table in schema.tables.values() {
            let path = format!("{}Schema.py", type_ident(&table.name));
            output.push(path, self.table_module(schema, table));
        }

        output.push("__init__.py", init_module(schema));

        Ok(output)
    }
}

impl Transfer {
    fn table_module(&self, schema: &Schema, table: &Table) -> String {
        let mut f = Formatter::new();
        let class = &type_ident(&table.name);
        let relations = relation::embedded(schema, &table.name);
        let package = self.models_package.as_str();

        fmt!(&mut f, Lines([
            "import uuid",
            "import datetime",
            "from pydantic import BaseModel, Field, ConfigDict",
            "from typing import Optional, List, ForwardRef",
        ]));

        for name in enum_refs(table) {
            let ident = &type_ident(name);
            fmt!(&mut f, "from " package "." ident.as_str() "Enum import " ident "\n");
        }

        fmt!(&mut f, "\n");

        // Sorted so the header does not depend on foreign key order
        let related: BTreeSet<_> = relations.iter().map(schema_class).collect();
        for name in &related {
            fmt!(&mut f, name " = ForwardRef('" name "')\n");
        }

        fmt!(&mut f, "\n\nclass " class "Schema(BaseModel):\n");

        for column in table.visible_columns() {
            let py = &Python.map(&column.ty);
            fmt!(&mut f,
                "    " column.field_name() ": Optional[" py "] = Field(default=None, alias='"
                column.name.as_str() "')\n"
            );
        }

        for relation in &relations {
            let peer = &schema_class(relation);
            if relation.is_many() {
                fmt!(&mut f, "    " relation.field ": List['" peer "'] = []\n");
            } else {
                fmt!(&mut f, "    " relation.field ": Optional['" peer "'] = None\n");
            }
        }

        fmt!(&mut f, "\n    model_config = ConfigDict(");
        fmt!(&mut f, "from_attributes=True, populate_by_name=True)\n\n");

        fmt!(&mut f, "    def to_model(self) -> '" class "':\n");
        fmt!(&mut f, "        from " package "." class.as_str() "Model import " class "\n");

        let init: Vec<_> = table
            .visible_columns()
            .map(|column| format!("{}=self.{}", column.name, column.field_name()))
            .collect();

        if init.is_empty() {
            fmt!(&mut f, "        model = " class "()\n");
        } else {
            fmt!(&mut f, "        model = " class "(\n");
            for arg in &init {
                fmt!(&mut f, "            " arg ",\n");
            }
            fmt!(&mut f, "        )\n");
        }

        for relation in &relations {
            let field = relation.field;
            if relation.is_many() {
                fmt!(&mut f,
                    "        model." field " = [obj.to_model() for obj in self." field "]\n"
                );
            } else {
                fmt!(&mut f, "        if self." field " is not None:\n");
                fmt!(&mut f, "            model." field " = self." field ".to_model()\n");
            }
        }

        fmt!(&mut f, "        return model\n");

        f.finish()
    }
}

fn schema_class(relation: &Relation<'_>) -> String {
    format!("{}Schema", relation.peer_type())
}

fn enum_refs(table: &Table) -> IndexSet<&str> {
    table
        .visible_columns()
        .filter_map(|column| match &column.ty {
            Type::Enum(name) => Some(name.as_str()),
            Type::Array(element) => element.as_enum(),
            _ => None,
        })
        .collect()
}

/// Imports every schema, then resolves the forward references between them.
fn init_module(schema: &Schema) -> String {
    let mut f = Formatter::new();

    for table in schema.tables.values() {
        let ident = &type_ident(&table.name);
        fmt!(&mut f, "from ." ident.as_str() "Schema import " ident "Schema\n");
    }

    if !schema.tables.is_empty() {
        fmt!(&mut f, "\n");
    }

    for table in schema.tables.values() {
        let ident = &type_ident(&table.name);
        fmt!(&mut f, ident "Schema.model_rebuild(_types_namespace=globals())\n");
    }

    f.finish()
}
