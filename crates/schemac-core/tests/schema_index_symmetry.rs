use schemac_core::schema::ForeignKey;
use schemac_core::{Diagnostics, Schema};

const SCHEMA: &str = "
Table Groups {
  id UUID [primary key]
}
Table Users {
  id UUID [primary key]
  group_id UUID
  mentor_id UUID
}
Table Posts {
  id UUID [primary key]
  author_id UUID
  group_id UUID
}
FK Users.group_id -> Groups.id [refer_left]
FK Users.mentor_id as mentor -> Users.id as mentees [one_to_one]
FK Posts.author_id as author -> Users.id as posts
FK Posts.group_id -> Groups.id [many_to_many] [refer_left]
";

fn check_symmetry(schema: &Schema) {
    for (table, fks) in schema.foreign_keys.iter() {
        for fk in fks {
            assert_eq!(fk.source_table, table);
            assert!(schema.reverse_fks.contains(&fk.target_table, fk), "{fk}");
        }
    }

    for (table, fks) in schema.reverse_fks.iter() {
        for fk in fks {
            assert_eq!(fk.target_table, table);
            assert!(schema.foreign_keys.contains(&fk.source_table, fk), "{fk}");
        }
    }

    assert_eq!(schema.foreign_keys.len(), schema.reverse_fks.len());
}

#[test]
fn every_fk_is_in_one_bucket_of_each_index() {
    let schema = Schema::parse(SCHEMA).unwrap();

    check_symmetry(&schema);
    assert_eq!(schema.foreign_keys.len(), 4);
    assert_eq!(schema.forward_fks("Users").len(), 2);
    assert_eq!(schema.forward_fks("Posts").len(), 2);
    assert_eq!(schema.reverse_fks_for("Groups").len(), 2);
    assert_eq!(schema.reverse_fks_for("Users").len(), 2);
}

#[test]
fn buckets_keep_parse_order() {
    let schema = Schema::parse(SCHEMA).unwrap();

    let into_groups: Vec<_> = schema
        .reverse_fks_for("Groups")
        .iter()
        .map(ForeignKey::source_path)
        .collect();

    assert_eq!(into_groups, ["Users.group_id", "Posts.group_id"]);
    assert_eq!(
        schema.foreign_keys.tables().collect::<Vec<_>>(),
        ["Users", "Posts"]
    );
}

#[test]
fn fk_lines_may_precede_their_tables() {
    let moved = format!(
        "FK Users.group_id -> Groups.id\n{}",
        SCHEMA.replace("FK Users.group_id -> Groups.id [refer_left]\n", "")
    );

    let mut diagnostics = Diagnostics::new();
    let schema = Schema::parse_with_diagnostics(&moved, &mut diagnostics).unwrap();

    check_symmetry(&schema);
    assert!(diagnostics.is_empty());
}

#[test]
fn edited_artifact_fails_verification() {
    let schema = Schema::parse(SCHEMA).unwrap();

    let mut json = serde_json::to_value(&schema).unwrap();
    json["reverse_fks"]["Groups"]
        .as_array_mut()
        .unwrap()
        .remove(0);

    let reloaded: Schema = serde_json::from_value(json).unwrap();
    let err = reloaded.verify().unwrap_err();

    assert!(err.is_invalid_schema());
}
