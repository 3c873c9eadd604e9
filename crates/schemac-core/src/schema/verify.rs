use super::{FkIndex, ForeignKey, Schema};
use crate::{Error, Result};

use std::collections::HashMap;

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    /// Checks the structural invariants of a resolved schema.
    ///
    /// Run after every build and whenever a schema is loaded from persisted
    /// artifacts, which may have been edited or mixed from different runs.
    pub fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        self.verify_entity_keys()?;
        self.verify_single_primary_key()?;
        self.verify_bucket_keys()?;
        self.verify_index_symmetry()?;
        self.verify_circular_deps_are_tables()?;
        self.verify_relation_fields()?;
        Ok(())
    }

    fn verify_entity_keys(&self) -> Result<()> {
        let schema = self.schema;

        let keys = schema
            .tables
            .iter()
            .map(|(key, table)| (key, &table.name))
            .chain(schema.enums.iter().map(|(key, e)| (key, &e.name)))
            .chain(schema.models.iter().map(|(key, m)| (key, &m.name)))
            .chain(schema.protocols.iter().map(|(key, p)| (key, &p.name)));

        for (key, name) in keys {
            if key != name {
                return Err(Error::invalid_schema(format!(
                    "entity stored under `{key}` is named `{name}`"
                )));
            }
        }

        Ok(())
    }

    fn verify_single_primary_key(&self) -> Result<()> {
        for table in self.schema.tables.values() {
            let count = table.columns.iter().filter(|c| c.is_primary_key()).count();

            if count > 1 {
                return Err(Error::invalid_schema(format!(
                    "table `{}` has {count} primary key columns",
                    table.name
                )));
            }
        }

        Ok(())
    }

    fn verify_bucket_keys(&self) -> Result<()> {
        for (table, fks) in self.schema.foreign_keys.iter() {
            if let Some(fk) = fks.iter().find(|fk| fk.source_table != table) {
                return Err(Error::invalid_schema(format!(
                    "forward index bucket `{table}` holds `{fk}`"
                )));
            }
        }

        for (table, fks) in self.schema.reverse_fks.iter() {
            if let Some(fk) = fks.iter().find(|fk| fk.target_table != table) {
                return Err(Error::invalid_schema(format!(
                    "reverse index bucket `{table}` holds `{fk}`"
                )));
            }
        }

        Ok(())
    }

    /// Every foreign key appears in exactly one bucket of each index.
    ///
    /// Bucket keys are checked first, so comparing how often each foreign key
    /// occurs in its source bucket and in its target bucket is enough.
    /// Repeated `FK` lines are legal and must be repeated in both indexes.
    fn verify_index_symmetry(&self) -> Result<()> {
        let forward = &self.schema.foreign_keys;
        let reverse = &self.schema.reverse_fks;

        if forward.len() != reverse.len() {
            return Err(Error::invalid_schema(format!(
                "forward index holds {} foreign keys, reverse index holds {}",
                forward.len(),
                reverse.len()
            )));
        }

        for fk in forward.all() {
            let in_forward = occurrences(forward, &fk.source_table, fk);
            let in_reverse = occurrences(reverse, &fk.target_table, fk);

            if in_forward != in_reverse {
                return Err(Error::invalid_schema(format!(
                    "`{fk}` appears {in_forward} time(s) in the forward index \
                     and {in_reverse} in the reverse index"
                )));
            }
        }

        Ok(())
    }

    fn verify_circular_deps_are_tables(&self) -> Result<()> {
        let known = |table: &str| {
            let touches = |fk: &ForeignKey| fk.source_table == table || fk.target_table == table;
            self.schema.tables.contains_key(table) || self.schema.foreign_keys.all().any(touches)
        };

        for (from, to) in self.schema.circular_deps.iter() {
            if !known(from) || !known(to) {
                return Err(Error::invalid_schema(format!(
                    "circular dependency `({from}, {to})` names an unknown table"
                )));
            }
        }

        Ok(())
    }

    /// Relationship fields are named by the FK aliases, so no two foreign
    /// keys may give the same table the same alias. Both ends count, since
    /// the ORM declares both.
    fn verify_relation_fields(&self) -> Result<()> {
        let mut fields: HashMap<(&str, &str), (&ForeignKey, bool)> = HashMap::new();

        for fk in self.schema.foreign_keys.all() {
            let ends = [
                (fk.source_table.as_str(), fk.left_alias.as_str(), true),
                (fk.target_table.as_str(), fk.right_alias.as_str(), false),
            ];

            for (table, field, source_end) in ends {
                match fields.get(&(table, field)) {
                    // A repeated `FK` line declares the same field again
                    Some(&(other, other_end)) if other == fk && other_end == source_end => {}
                    Some(&(other, _)) => {
                        return Err(Error::invalid_schema(format!(
                            "relationship field `{table}.{field}` is declared by both \
                             `{other}` and `{fk}`; name one of them with `as <alias>`"
                        )));
                    }
                    None => {
                        fields.insert((table, field), (fk, source_end));
                    }
                }
            }
        }

        Ok(())
    }
}

fn occurrences(index: &FkIndex, table: &str, fk: &ForeignKey) -> usize {
    index.get(table).iter().filter(|c| *c == fk).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Modifier, Table, Type};

    fn schema() -> Schema {
        Schema::parse(
            "Table Groups {\n  id UUID [primary key]\n}\n\
             Table Users {\n  id UUID [primary key]\n  group_id UUID\n}\n\
             FK Users.group_id -> Groups.id",
        )
        .unwrap()
    }

    #[test]
    fn parsed_schema_verifies() {
        schema().verify().unwrap();
    }

    #[test]
    fn missing_reverse_entry() {
        let mut schema = schema();
        schema.reverse_fks = FkIndex::new();

        let err = schema.verify().unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn misfiled_bucket() {
        let mut schema = schema();
        let fk = schema.foreign_keys.get("Users")[0].clone();

        schema.reverse_fks = FkIndex::new();
        schema.reverse_fks.push("Users", fk);

        let err = schema.verify().unwrap_err();
        assert!(err.to_string().contains("reverse index bucket `Users`"));
    }

    #[test]
    fn two_primary_keys() {
        let mut schema = schema();
        let table = schema.tables.get_mut("Groups").unwrap();
        table.columns.push(Column {
            name: "code".to_string(),
            ty: Type::Text,
            modifiers: vec![Modifier::PrimaryKey],
        });

        let err = schema.verify().unwrap_err();
        assert!(err.to_string().contains("2 primary key columns"));
    }

    const MESSAGES: &str = "\
Table Users {
  id UUID [pk]
}
Table Messages {
  id UUID [pk]
  sender_id UUID
  receiver_id UUID
}
";

    #[test]
    fn two_default_aliases_to_one_table_collide() {
        let src = format!(
            "{MESSAGES}FK Messages.sender_id -> Users.id\nFK Messages.receiver_id -> Users.id"
        );

        let err = Schema::parse(&src).unwrap_err();
        assert!(err.is_invalid_schema());

        let message = err.to_string();
        assert!(
            message.contains("relationship field `Messages.user`"),
            "{message}"
        );
    }

    #[test]
    fn explicit_aliases_keep_fields_apart() {
        let src = format!(
            "{MESSAGES}FK Messages.sender_id as sender -> Users.id as sent\n\
             FK Messages.receiver_id as receiver -> Users.id as received"
        );

        Schema::parse(&src).unwrap().verify().unwrap();
    }

    #[test]
    fn self_reference_with_one_alias_for_both_ends() {
        let src = "Table Tasks {\n  id UUID [pk]\n  parent_id UUID\n}\n\
                   FK Tasks.parent_id as related -> Tasks.id as related";

        let err = Schema::parse(src).unwrap_err();
        assert!(err.to_string().contains("`Tasks.related`"), "{err}");
    }

    #[test]
    fn repeated_fk_line_is_accepted() {
        let src = format!(
            "{MESSAGES}FK Messages.sender_id -> Users.id\nFK Messages.sender_id -> Users.id"
        );

        let schema = Schema::parse(&src).unwrap();
        assert_eq!(schema.foreign_keys.len(), 2);
    }

    #[test]
    fn renamed_entity() {
        let mut schema = schema();
        let mut table = Table::new("Teams");
        table.columns = schema.tables["Groups"].columns.clone();
        schema.tables.insert("Groups".to_string(), table);

        assert!(schema.verify().is_err());
    }
}
