use crate::fmt::{Comma, Formatter};
use crate::relation;
use crate::type_map::{Swift, TypeMap};
use crate::{Emitter, EmitterKind, Output};

use schemac_core::schema::{accessor_ident, type_ident, Enum, Schema, Table};
use schemac_core::{Diagnostic, Diagnostics, Result};

/// Swift `Codable` structs mirroring the transfer schemas, plus one
/// `String`-backed enum per schema enum.
///
/// Structs conform to the app's `BeeCodableModel`, whose only requirement is
/// the `serverTypeMap` emitted here.
///
/// Stored properties keep the column names so the structs decode the server's
/// payloads without coding keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientModel;

impl Emitter for ClientModel {
    fn kind(&self) -> EmitterKind {
        EmitterKind::ClientModel
    }

    fn emit(&self, schema: &Schema) -> Result<Output> {
        let mut output = Output::new();

        for table in schema.tables.values() {
            let path = format!("{}.swift", type_ident(&table.name));
            let contents = model_struct(schema, table, &mut output.diagnostics);
            output.push(path, contents);
        }

        for enumeration in schema.enums.values() {
            let path = format!("{}Enum.swift", type_ident(&enumeration.name));
            let contents = enum_decl(enumeration, &mut output.diagnostics);
            output.push(path, contents);
        }

        Ok(output)
    }
}

fn model_struct(
    schema: &Schema,
    table: &Table,
    diagnostics: &mut Diagnostics,
) -> String {
    let mut f = Formatter::new();
    let name = &type_ident(&table.name);

    let primary_key = match table.primary_key() {
        Some(key) if key.is_hidden() => {
            diagnostics.push(Diagnostic::defaulted(
                format!("{}.{}", table.name, key.name),
                "primary key is hidden; struct is not `Identifiable`",
            ));
            None
        }
        key => key,
    };

    let mut conformance = vec!["Codable"];
    if primary_key.is_some() {
        conformance.push("Identifiable");
    }
    conformance.extend(["Hashable", "BeeCodableModel"]);

    fmt!(&mut f, "import Foundation\n\n");
    fmt!(&mut f, "struct " name ": " Comma(conformance) " {\n");

    for column in table.visible_columns() {
        fmt!(&mut f, "    var " column.name.as_str() ": " Swift.map(&column.ty) "?\n");
    }

    for relation in relation::embedded(schema, &table.name) {
        let peer = &relation.peer_type();
        if relation.is_many() {
            fmt!(&mut f, "    var " relation.field ": [" peer "] = []\n");
        } else {
            fmt!(&mut f, "    var " relation.field ": " peer "?\n");
        }
    }

    fmt!(&mut f, "\n    static var serverTypeMap: [String: String] {\n");
    fmt!(&mut f, "        return [\n");
    for column in table.visible_columns() {
        let ty = column.ty.to_string();
        fmt!(&mut f, "            \"" column.name.as_str() "\": \"" ty "\",\n");
    }
    fmt!(&mut f, "        ]\n    }\n");

    // A key column named `id` already satisfies `Identifiable`
    if let Some(key) = primary_key.filter(|key| key.name != "id") {
        let ty = &Swift.map(&key.ty);
        match Swift.default_literal(&key.ty) {
            Some(default) => {
                fmt!(&mut f, "\n    var id: " ty " {\n");
                fmt!(&mut f, "        return " key.name.as_str() " ?? " default "\n    }\n");
            }
            None => {
                fmt!(&mut f, "\n    var id: " ty "? {\n");
                fmt!(&mut f, "        return " key.name.as_str() "\n    }\n");
            }
        }
    }

    fmt!(&mut f, "}\n");

    f.finish()
}

fn enum_decl(enumeration: &Enum, diagnostics: &mut Diagnostics) -> String {
    let mut f = Formatter::new();
    let name = &type_ident(&enumeration.name);

    fmt!(&mut f, "import Foundation\n\n");
    fmt!(&mut f, "enum " name ": String, Codable, CaseIterable {\n");

    for value in &enumeration.values {
        let member = accessor_ident(value.member());
        fmt!(&mut f, "    case " member " = \"" value.value.as_str() "\"\n");
    }

    match enumeration.default_member() {
        Ok(member) => {
            fmt!(&mut f, "\n    static var defaultValue: " name " {\n");
            fmt!(&mut f, "        return ." accessor_ident(member.member()) "\n    }\n");
        }
        Err(err) => diagnostics.push(Diagnostic::defaulted(
            &enumeration.name,
            format!("{err}; `defaultValue` not generated"),
        )),
    }

    fmt!(&mut f, "}\n");

    f.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemac_core::DiagnosticKind;

    #[test]
    fn computed_id_for_underscored_key() {
        let schema = Schema::parse("Table Notes {\n  _id UUID [pk]\n  body TEXT\n}").unwrap();
        let output = ClientModel.emit(&schema).unwrap();
        let notes = &output.file("Notes.swift").unwrap().contents;

        let header = "struct Notes: Codable, Identifiable, Hashable, BeeCodableModel {\n";
        assert!(notes.contains(header));
        assert!(notes.contains("    var _id: UUID?\n"));
        assert!(notes.contains("    var id: UUID {\n        return _id ?? UUID()\n    }\n"));
    }

    #[test]
    fn no_key_no_identifiable() {
        let schema = Schema::parse("Table Audit {\n  note TEXT\n}").unwrap();
        let output = ClientModel.emit(&schema).unwrap();
        let audit = &output.file("Audit.swift").unwrap().contents;

        let header = "struct Audit: Codable, Hashable, BeeCodableModel {\n";
        assert!(audit.contains(header));
        assert!(!audit.contains("var id"));
    }

    #[test]
    fn hidden_key_is_not_identifiable() {
        let src = "Table Tokens {\n  _id UUID [pk, hidden]\n  value TEXT\n}";
        let schema = Schema::parse(src).unwrap();
        let output = ClientModel.emit(&schema).unwrap();
        let tokens = &output.file("Tokens.swift").unwrap().contents;

        let header = "struct Tokens: Codable, Hashable, BeeCodableModel {\n";
        assert!(tokens.contains(header));
        assert!(!tokens.contains("_id"));
        assert!(!tokens.contains("var id"));

        let diagnostics: Vec<_> = output.diagnostics.about("Tokens._id").collect();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Defaulted);
    }

    #[test]
    fn enum_without_default() {
        let schema = Schema::parse("Enum Colors {\n  RED\n  BLUE\n}").unwrap();
        let output = ClientModel.emit(&schema).unwrap();
        let colors = &output.file("ColorsEnum.swift").unwrap().contents;

        assert!(colors.contains("    case red = \"RED\"\n"));
        assert!(!colors.contains("defaultValue"));

        let diagnostics: Vec<_> = output.diagnostics.about("Colors").collect();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Defaulted);
    }
}
