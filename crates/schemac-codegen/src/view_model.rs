use crate::fmt::Formatter;
use crate::relation;
use crate::type_map::{Swift, TypeMap};
use crate::{Emitter, EmitterKind, Output};

use schemac_core::schema::{type_ident, Schema, Table, Type};
use schemac_core::{Diagnostic, Diagnostics, Result};

/// SwiftUI view models wrapping the client-model structs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewModel;

impl Emitter for ViewModel {
    fn kind(&self) -> EmitterKind {
        EmitterKind::ViewModel
    }

    fn emit(&self, schema: &Schema) -> Result<Output> {
        let mut output = Output::new();

        for table in schema.tables.values() {
            let path = format!("{}ViewModel.swift", type_ident(&table.name));
            let contents = view_model_class(schema, table, &mut output.diagnostics);
            output.push(path, contents);
        }

        Ok(output)
    }
}

fn view_model_class(
    schema: &Schema,
    table: &Table,
    diagnostics: &mut Diagnostics,
) -> String {
    let mut f = Formatter::new();
    let model = &type_ident(&table.name);
    let class = &format!("{model}ViewModel");
    let relations = relation::embedded(schema, &table.name);

    fmt!(&mut f, "import Foundation\nimport SwiftUI\n\n");
    fmt!(&mut f, "class " class ": ObservableObject, Identifiable, Hashable {\n");

    for column in table.visible_columns() {
        fmt!(&mut f, "    @Published var " column.name.as_str() ": " Swift.map(&column.ty) "?\n");
    }

    for relation in &relations {
        let peer = &format!("{}ViewModel", relation.peer_type());
        if relation.is_many() {
            fmt!(&mut f, "    @Published var " relation.field ": [" peer "] = []\n");
        } else {
            fmt!(&mut f, "    @Published var " relation.field ": " peer "?\n");
        }
    }

    // Identity until the model carries a key
    fmt!(&mut f, "\n    private let localId = UUID()\n");

    fmt!(&mut f, "\n    init(model: " model ") {\n");
    fmt!(&mut f, "        fromModel(model)\n    }\n");

    fmt!(&mut f, "\n    func fromModel(_ model: " model ") {\n");
    for column in table.visible_columns() {
        let name = column.name.as_str();
        fmt!(&mut f, "        self." name " = model." name "\n");
    }
    for relation in &relations {
        let field = relation.field;
        let peer = &format!("{}ViewModel", relation.peer_type());
        fmt!(&mut f, "        self." field " = model." field ".map { " peer "(model: $0) }\n");
    }
    fmt!(&mut f, "    }\n");

    match table.primary_key() {
        Some(key) if key.is_hidden() => {
            diagnostics.push(Diagnostic::defaulted(
                format!("{}.{}", table.name, key.name),
                "primary key is hidden; `id` falls back to `localId`",
            ));
            fmt!(&mut f, "\n    var id: UUID {\n");
            fmt!(&mut f, "        return localId\n    }\n");
        }
        Some(key) if key.ty == Type::Id => {
            fmt!(&mut f, "\n    var id: UUID {\n");
            fmt!(&mut f, "        return " key.name.as_str() " ?? localId\n    }\n");
        }
        _ => {
            fmt!(&mut f, "\n    var id: UUID {\n");
            fmt!(&mut f, "        return localId\n    }\n");
        }
    }

    fmt!(&mut f, "\n    static func == (lhs: " class ", rhs: " class ") -> Bool {\n");
    fmt!(&mut f, "        return lhs.id == rhs.id\n    }\n");
    fmt!(&mut f, "\n    func hash(into hasher: inout Hasher) {\n");
    fmt!(&mut f, "        hasher.combine(id)\n    }\n");
    fmt!(&mut f, "}\n");

    f.finish()
}
