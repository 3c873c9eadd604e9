use crate::fmt::Formatter;
use crate::type_map::{Swift, TypeMap};
use crate::{Emitter, EmitterKind, Output};

use schemac_core::schema::{type_ident, Column, Schema, Table, Type};
use schemac_core::{Diagnostic, Result};

/// `ServerEndPoints` extensions with get, addOrUpdate, getAll and delete
/// calls per table. Every call is addressed by primary key, so tables without
/// one are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Endpoint;

impl Emitter for Endpoint {
    fn kind(&self) -> EmitterKind {
        EmitterKind::Endpoint
    }

    fn emit(&self, schema: &Schema) -> Result<Output> {
        let mut output = Output::new();

        for table in schema.tables.values() {
            let Some(key) = table.primary_key() else {
                output.diagnostics.push(Diagnostic::skipped(
                    &table.name,
                    "no primary key column; endpoint not generated",
                ));
                continue;
            };

            let path = format!("{}Endpoint.swift", type_ident(&table.name));
            output.push(path, extension(table, key));
        }

        Ok(output)
    }
}

fn extension(table: &Table, key: &Column) -> String {
    let mut f = Formatter::new();
    let model = &type_ident(&table.name);
    let route = table.name.as_str();

    fmt!(&mut f, "import Foundation\n\n");
    fmt!(&mut f, "extension ServerEndPoints {\n\n");

    // get
    let single = &callback(model);
    fmt!(&mut f, "    func get" model "(id: String, " single ") {\n");
    token_guard(&mut f);
    url_guard(&mut f, route, "get/\\(id)");
    request(&mut f, "GET");
    fmt!(&mut f, "        send(request, expecting: " model ".self, completion: completion)\n");
    fmt!(&mut f, "    }\n\n");

    // addOrUpdate
    fmt!(&mut f, "    func addOrUpdate" model "(_ obj: " model ", " single ") {\n");
    token_guard(&mut f);
    fmt!(&mut f, "        let id = AuthenticateViewModel.shared.getGroupId()\n");
    url_guard(&mut f, route, "\\(id)");
    fmt!(&mut f, "        guard let body = try? encodeModel(obj) else {\n");
    fmt!(&mut f, "            completion(.failure(ServerError.noData))\n");
    fmt!(&mut f, "            return\n");
    fmt!(&mut f, "        }\n");
    request(&mut f, "POST");
    fmt!(&mut f, "        request.httpBody = body\n");
    fmt!(&mut f, "        request.setValue(\"application/json\", ");
    fmt!(&mut f, "forHTTPHeaderField: \"Content-Type\")\n");
    fmt!(&mut f, "        send(request, expecting: " model ".self, completion: completion)\n");
    fmt!(&mut f, "    }\n\n");

    // getAll
    let all = &format!("[{model}]");
    fmt!(&mut f, "    func getAll" model "(" callback(all) ") {\n");
    token_guard(&mut f);
    fmt!(&mut f, "        let id = AuthenticateViewModel.shared.getGroupId()\n");
    url_guard(&mut f, route, "\\(id)");
    request(&mut f, "GET");
    fmt!(&mut f, "        send(request, expecting: [" model "].self, completion: completion)\n");
    fmt!(&mut f, "    }\n\n");

    // delete
    let (id_type, id_segment) = match key.ty {
        Type::Id => ("UUID".to_string(), "\\(id.uuidString)"),
        _ => (Swift.map(&key.ty), "\\(id)"),
    };
    fmt!(&mut f, "    func delete" model "(id: " id_type ", " callback("String") ") {\n");
    token_guard(&mut f);
    url_guard(&mut f, route, id_segment);
    request(&mut f, "DELETE");
    fmt!(&mut f, "        send(request, expecting: String.self, completion: completion)\n");
    fmt!(&mut f, "    }\n");

    fmt!(&mut f, "}\n");

    f.finish()
}

/// The trailing `completion` parameter of a call returning `ty`
fn callback(ty: &str) -> String {
    format!("completion: @escaping (Result<{ty}, Error>) -> Void")
}

fn token_guard(f: &mut Formatter) {
    fmt!(f, "        guard let token = AuthenticateViewModel.shared.getToken() else {\n");
    fmt!(f, "            completion(.failure(ServerError.missingToken))\n");
    fmt!(f, "            return\n");
    fmt!(f, "        }\n");
}

fn url_guard(f: &mut Formatter, route: &str, segment: &str) {
    fmt!(f, "        guard let url = URL(string: \"\\(baseURL)" route "/" segment "\") else {\n");
    fmt!(f, "            completion(.failure(ServerError.invalidURL))\n");
    fmt!(f, "            return\n");
    fmt!(f, "        }\n");
}

fn request(f: &mut Formatter, method: &str) {
    fmt!(f, "        var request = URLRequest(url: url)\n");
    fmt!(f, "        request.httpMethod = \"" method "\"\n");
    fmt!(f, "        request.setValue(\"Bearer \\(token)\", ");
    fmt!(f, "forHTTPHeaderField: \"Authorization\")\n");
}
