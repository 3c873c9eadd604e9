use crate::fmt::{Comma, Formatter};
use crate::type_map::{Swift, TypeMap};
use crate::{Emitter, EmitterKind, Output};

use schemac_core::schema::{accessor_ident, type_ident, CompositeModel, Protocol, Schema};
use schemac_core::{Diagnostic, Diagnostics, Result};

/// Swift protocols, the composite models conforming to them, and one
/// decoding factory per protocol that has conforming models.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolEmitter;

impl Emitter for ProtocolEmitter {
    fn kind(&self) -> EmitterKind {
        EmitterKind::Protocol
    }

    fn emit(&self, schema: &Schema) -> Result<Output> {
        let mut output = Output::new();

        for protocol in schema.protocols.values() {
            let path = format!("{}Protocol.swift", type_ident(&protocol.name));
            output.push(path, protocol_decl(protocol));
        }

        for model in schema.models.values() {
            let path = format!("{}.swift", type_ident(&model.name));
            let contents = model_struct(schema, model, &mut output.diagnostics);
            output.push(path, contents);
        }

        for protocol in schema.protocols.values() {
            let models: Vec<_> = schema.conforming_models(&protocol.name).collect();
            if models.is_empty() {
                continue;
            }

            let path = format!("{}Factory.swift", type_ident(&protocol.name));
            output.push(path, factory(protocol, &models));
        }

        Ok(output)
    }
}

fn protocol_decl(protocol: &Protocol) -> String {
    let mut f = Formatter::new();

    fmt!(&mut f, "import Foundation\n\n");
    fmt!(&mut f, "protocol " type_ident(&protocol.name) ": Codable, Hashable {\n");

    for method in &protocol.methods {
        fmt!(&mut f,
            "    var " method.name.as_str() ": " Swift.map_token(&method.return_type) " { get }\n"
        );
    }

    fmt!(&mut f, "}\n");

    f.finish()
}

fn model_struct(
    schema: &Schema,
    model: &CompositeModel,
    diagnostics: &mut Diagnostics,
) -> String {
    let mut f = Formatter::new();

    let mut conformance = vec![];
    for parent in &model.parents {
        if schema.protocols.contains_key(parent) {
            conformance.push(type_ident(parent));
        } else {
            diagnostics.push(Diagnostic::dangling(
                &model.name,
                format!("extends undeclared protocol `{parent}`; conformance dropped"),
            ));
        }
    }
    conformance.extend(["Codable", "Hashable", "DisplayableModel"].map(String::from));

    fmt!(&mut f, "import Foundation\n\n");
    fmt!(&mut f, "struct " type_ident(&model.name) ": " Comma(conformance) " {\n");

    for field in &model.fields {
        if field.property == "id" {
            fmt!(&mut f, "    var id: UUID = UUID()\n");
            continue;
        }

        fmt!(&mut f,
            "    var " field.property.as_str() ": " Swift.map_token(&field.ty) " = "
            Swift.default_for_token(&field.ty) "\n"
        );
    }

    fmt!(&mut f, "\n    func getDisplayNames() -> [String: DisplayFieldInfo] {\n");

    let mut labeled = model.labeled_fields().peekable();
    if labeled.peek().is_none() {
        fmt!(&mut f, "        return [:]\n");
    } else {
        fmt!(&mut f, "        return [\n");
        for field in labeled {
            fmt!(&mut f,
                "            \"" field.property.as_str() "\": DisplayFieldInfo(label: \""
                field.label.as_str() "\", type: \"" Swift.map_token(&field.ty) "\"),\n"
            );
        }
        fmt!(&mut f, "        ]\n");
    }

    fmt!(&mut f, "    }\n");
    fmt!(&mut f, "}\n");

    f.finish()
}

fn factory(protocol: &Protocol, models: &[&CompositeModel]) -> String {
    let mut f = Formatter::new();
    let name = &type_ident(&protocol.name);

    fmt!(&mut f, "import Foundation\n\n");

    fmt!(&mut f, "enum " name "Types: String, Codable, CaseIterable {\n");
    for model in models {
        fmt!(&mut f, "    case " accessor_ident(&model.name) "\n");
    }
    fmt!(&mut f, "}\n\n");

    fmt!(&mut f, "enum " name "Factory {\n");
    fmt!(&mut f,
        "    static func create(from data: Data, type: " name "Types) -> (any " name ")? {\n"
    );
    fmt!(&mut f, "        switch type {\n");
    for model in models {
        let ty = type_ident(&model.name);
        fmt!(&mut f, "        case ." accessor_ident(&model.name) ":\n");
        fmt!(&mut f, "            return try? JSONDecoder().decode(" ty ".self, from: data)\n");
    }
    fmt!(&mut f, "        }\n");
    fmt!(&mut f, "    }\n");
    fmt!(&mut f, "}\n");

    f.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemac_core::DiagnosticKind;

    const SRC: &str = "\
Protocol Account {
  name TEXT
  balance FLOAT
}
Model bank_account extends Account {
  id;UUID;NOFORM
  name;TEXT;Account name
  balance;FLOAT;Balance
  opened;DATE;NOFORM
}
Model wallet extends Account, Ledger {
  name;TEXT;NOFORM
}
";

    #[test]
    fn composite_model() {
        let schema = Schema::parse(SRC).unwrap();
        let output = ProtocolEmitter.emit(&schema).unwrap();

        assert_eq!(
            output.file("BankAccount.swift").unwrap().contents,
            "import Foundation\n\
             \n\
             struct BankAccount: Account, Codable, Hashable, DisplayableModel {\n    \
             var id: UUID = UUID()\n    \
             var name: String = \"\"\n    \
             var balance: Double = 0.0\n    \
             var opened: Date = Date()\n\
             \n    \
             func getDisplayNames() -> [String: DisplayFieldInfo] {\n        \
             return [\n            \
             \"name\": DisplayFieldInfo(label: \"Account name\", type: \"String\"),\n            \
             \"balance\": DisplayFieldInfo(label: \"Balance\", type: \"Double\"),\n        \
             ]\n    \
             }\n\
             }\n"
        );
    }

    #[test]
    fn factory_lists_conforming_models() {
        let schema = Schema::parse(SRC).unwrap();
        let output = ProtocolEmitter.emit(&schema).unwrap();
        let factory = &output.file("AccountFactory.swift").unwrap().contents;

        assert!(factory.contains(
            "enum AccountTypes: String, Codable, CaseIterable {\n    \
             case bankAccount\n    \
             case wallet\n\
             }"
        ));
        assert!(factory.contains(
            "        case .wallet:\n            \
             return try? JSONDecoder().decode(Wallet.self, from: data)\n"
        ));
        assert!(output.file("LedgerFactory.swift").is_none());
    }

    #[test]
    fn undeclared_parent_is_dropped() {
        let schema = Schema::parse(SRC).unwrap();
        let output = ProtocolEmitter.emit(&schema).unwrap();
        let wallet = &output.file("Wallet.swift").unwrap().contents;

        assert!(wallet.contains("struct Wallet: Account, Codable, Hashable, DisplayableModel {"));
        assert!(wallet.contains("        return [:]\n"));

        let diagnostics: Vec<_> = output.diagnostics.about("wallet").collect();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Dangling);
    }

    #[test]
    fn protocol_declaration() {
        let schema = Schema::parse(SRC).unwrap();
        let output = ProtocolEmitter.emit(&schema).unwrap();

        assert_eq!(
            output.file("AccountProtocol.swift").unwrap().contents,
            "import Foundation\n\
             \n\
             protocol Account: Codable, Hashable {\n    \
             var name: String { get }\n    \
             var balance: Double { get }\n\
             }\n"
        );
    }
}
