use super::{
    CircularDeps, Column, CompositeModel, Enum, FkIndex, ForeignKey, Modifier, Protocol, Schema,
    Table, Type,
};
use crate::{Diagnostic, Diagnostics, Error, Result};

use indexmap::IndexMap;

/// Collects declarations and resolves them into a [`Schema`].
///
/// Declarations are kept in the order they are added. Resolution happens
/// once, in [`Builder::build`]: enum references are checked against the
/// declared enums, foreign keys are bucketed into the forward and reverse
/// indexes, and the circular dependency set is computed.
#[derive(Debug, Default)]
pub struct Builder {
    tables: IndexMap<String, Table>,
    enums: IndexMap<String, Enum>,
    models: IndexMap<String, CompositeModel>,
    protocols: IndexMap<String, Protocol>,
    foreign_keys: Vec<ForeignKey>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&mut self, table: Table) -> Result<&mut Self> {
        declare(&mut self.tables, "table", table.name.clone(), table)?;
        Ok(self)
    }

    pub fn enumeration(&mut self, enumeration: Enum) -> Result<&mut Self> {
        let name = enumeration.name.clone();
        declare(&mut self.enums, "enum", name, enumeration)?;
        Ok(self)
    }

    pub fn model(&mut self, model: CompositeModel) -> Result<&mut Self> {
        declare(&mut self.models, "model", model.name.clone(), model)?;
        Ok(self)
    }

    pub fn protocol(&mut self, protocol: Protocol) -> Result<&mut Self> {
        let name = protocol.name.clone();
        declare(&mut self.protocols, "protocol", name, protocol)?;
        Ok(self)
    }

    pub fn foreign_key(&mut self, fk: ForeignKey) -> &mut Self {
        self.foreign_keys.push(fk);
        self
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub(crate) fn enum_mut(&mut self, name: &str) -> Option<&mut Enum> {
        self.enums.get_mut(name)
    }

    pub(crate) fn model_mut(&mut self, name: &str) -> Option<&mut CompositeModel> {
        self.models.get_mut(name)
    }

    pub(crate) fn protocol_mut(&mut self, name: &str) -> Option<&mut Protocol> {
        self.protocols.get_mut(name)
    }

    /// Resolves the collected declarations. Semantic gaps are reported to
    /// `diagnostics`; the result is only an error if the resolved schema
    /// fails verification.
    pub fn build(self, diagnostics: &mut Diagnostics) -> Result<Schema> {
        let Builder {
            mut tables,
            enums,
            models,
            protocols,
            foreign_keys,
        } = self;

        for table in tables.values_mut() {
            for column in &mut table.columns {
                resolve_column_type(&table.name, column, &enums, diagnostics);
            }
        }

        let mut forward = FkIndex::new();
        let mut reverse = FkIndex::new();

        for fk in foreign_keys {
            for (table, column) in [
                (&fk.source_table, &fk.source_column),
                (&fk.target_table, &fk.target_column),
            ] {
                check_reference(&tables, table, column, &fk, diagnostics);
            }

            let source = fk.source_table.clone();
            reverse.push(&fk.target_table, fk.clone());
            forward.push(&source, fk);
        }

        let circular_deps = CircularDeps::detect(tables.keys().map(String::as_str), &forward);

        tracing::debug!(
            tables = tables.len(),
            enums = enums.len(),
            models = models.len(),
            protocols = protocols.len(),
            foreign_keys = forward.len(),
            "resolved schema"
        );

        let schema = Schema {
            tables,
            enums,
            models,
            protocols,
            foreign_keys: forward,
            reverse_fks: reverse,
            circular_deps,
        };

        schema.verify()?;

        Ok(schema)
    }
}

fn declare<T>(map: &mut IndexMap<String, T>, what: &str, name: String, value: T) -> Result<()> {
    if map.contains_key(&name) {
        return Err(Error::invalid_schema(format!(
            "{what} `{name}` is declared more than once"
        )));
    }

    map.insert(name, value);
    Ok(())
}

/// Enum references that do not name a declared enum fall back to text,
/// unless the column is explicitly marked `enum`.
fn resolve_column_type(
    table: &str,
    column: &mut Column,
    enums: &IndexMap<String, Enum>,
    diagnostics: &mut Diagnostics,
) {
    let name = match &column.ty {
        Type::Enum(name) => name,
        Type::Array(element) => match &**element {
            Type::Enum(name) => name,
            _ => return,
        },
        _ => return,
    };

    if enums.contains_key(name) {
        return;
    }

    let entity = format!("{table}.{}", column.name);

    if column.has(&Modifier::Enum) {
        diagnostics.push(Diagnostic::dangling(
            entity,
            format!("column is marked `enum` but `{name}` is not a declared enum"),
        ));
        return;
    }

    diagnostics.push(Diagnostic::defaulted(
        entity,
        format!("unknown column type `{}`, using TEXT", column.ty),
    ));

    column.ty = match column.ty {
        Type::Array(_) => Type::Array(Box::new(Type::Text)),
        _ => Type::Text,
    };
}

fn check_reference(
    tables: &IndexMap<String, Table>,
    table: &str,
    column: &str,
    fk: &ForeignKey,
    diagnostics: &mut Diagnostics,
) {
    let entity = fk.source_path();

    match tables.get(table) {
        None => diagnostics.push(Diagnostic::dangling(
            entity,
            format!("foreign key refers to undeclared table `{table}`"),
        )),
        Some(declared) if declared.column(column).is_none() => {
            diagnostics.push(Diagnostic::dangling(
                entity,
                format!("foreign key refers to undeclared column `{table}.{column}`"),
            ))
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticKind;

    fn column(name: &str, ty: Type, modifiers: Vec<Modifier>) -> Column {
        Column {
            name: name.to_string(),
            ty,
            modifiers,
        }
    }

    #[test]
    fn duplicate_table_is_rejected() {
        let mut builder = Builder::new();
        builder.table(Table::new("Users")).unwrap();

        let err = builder.table(Table::new("Users")).unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn foreign_key_lands_in_both_indexes() {
        let mut users = Table::new("Users");
        users.columns.push(column("group_id", Type::Id, vec![]));
        let mut groups = Table::new("Groups");
        let key = column("id", Type::Id, vec![Modifier::PrimaryKey]);
        groups.columns.push(key);

        let fk = ForeignKey::parse("FK Users.group_id -> Groups.id", &mut Diagnostics::new())
            .unwrap();

        let mut builder = Builder::new();
        builder.table(users).unwrap();
        builder.table(groups).unwrap();
        builder.foreign_key(fk.clone());

        let mut diagnostics = Diagnostics::new();
        let schema = builder.build(&mut diagnostics).unwrap();

        assert_eq!(schema.forward_fks("Users"), [fk.clone()]);
        assert_eq!(schema.reverse_fks_for("Groups"), [fk]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unknown_type_defaults_to_text() {
        let mut table = Table::new("Users");
        table
            .columns
            .push(column("mood", Type::Enum("Moods".into()), vec![]));

        let mut builder = Builder::new();
        builder.table(table).unwrap();

        let mut diagnostics = Diagnostics::new();
        let schema = builder.build(&mut diagnostics).unwrap();

        assert_eq!(schema.tables["Users"].columns[0].ty, Type::Text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().kind,
            DiagnosticKind::Defaulted
        );
    }

    #[test]
    fn enum_arrays_resolve() {
        let mut table = Table::new("Videos");
        table
            .columns
            .push(column("tags", Type::from_token("Tags[]"), vec![]));

        let mut builder = Builder::new();
        builder.enumeration(Enum::new("Tags")).unwrap();
        builder.table(table).unwrap();

        let schema = builder.build(&mut Diagnostics::new()).unwrap();

        assert_eq!(
            schema.tables["Videos"].columns[0].ty,
            Type::Array(Box::new(Type::Enum("Tags".into())))
        );
    }

    #[test]
    fn marked_enum_column_is_kept() {
        let mut table = Table::new("Videos");
        let kind = column(
            "kind",
            Type::Enum("VideoTypes".into()),
            vec![Modifier::Enum],
        );
        table.columns.push(kind);

        let mut builder = Builder::new();
        builder.table(table).unwrap();

        let mut diagnostics = Diagnostics::new();
        let schema = builder.build(&mut diagnostics).unwrap();

        assert_eq!(
            schema.tables["Videos"].columns[0].ty,
            Type::Enum("VideoTypes".into())
        );
        assert_eq!(
            diagnostics.iter().next().unwrap().kind,
            DiagnosticKind::Dangling
        );
    }
}
