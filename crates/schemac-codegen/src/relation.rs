use schemac_core::schema::{type_ident, ForeignKey, ReferDirection, Schema, Shape};

/// A relationship field on one table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Relation<'a> {
    pub(crate) fk: &'a ForeignKey,

    /// Field name on this table
    pub(crate) field: &'a str,

    /// Field name on the other table
    pub(crate) back: &'a str,

    /// The table on the other end
    pub(crate) peer: &'a str,

    pub(crate) shape: Shape,

    /// This table holds the foreign key column
    pub(crate) owning: bool,
}

impl<'a> Relation<'a> {
    /// The source side: named by the left alias, typed by the target
    pub(crate) fn source(fk: &'a ForeignKey) -> Relation<'a> {
        Relation {
            fk,
            field: &fk.left_alias,
            back: &fk.right_alias,
            peer: &fk.target_table,
            shape: fk.source_shape(),
            owning: true,
        }
    }

    /// The target side: named by the right alias, typed by the source
    pub(crate) fn target(fk: &'a ForeignKey) -> Relation<'a> {
        Relation {
            fk,
            field: &fk.right_alias,
            back: &fk.left_alias,
            peer: &fk.source_table,
            shape: fk.target_shape(),
            owning: false,
        }
    }

    pub(crate) fn peer_type(&self) -> String {
        type_ident(self.peer)
    }

    pub(crate) fn is_many(&self) -> bool {
        self.shape == Shape::Many
    }
}

/// Relationship fields embedded in `table`'s serialized form.
///
/// Each foreign key embeds on one side only: on the source when it is
/// `refer_left`, on the target when it is `refer_right`. Forward foreign keys
/// come first, then reverse ones, each in parse order.
pub(crate) fn embedded<'a>(schema: &'a Schema, table: &str) -> Vec<Relation<'a>> {
    let forward = schema
        .forward_fks(table)
        .iter()
        .filter(|fk| fk.refer == ReferDirection::Left)
        .map(Relation::source);

    let reverse = schema
        .reverse_fks_for(table)
        .iter()
        .filter(|fk| fk.refer == ReferDirection::Right)
        .map(Relation::target);

    forward.chain(reverse).collect()
}

/// Both ends of every foreign key touching `table`, as an ORM declares them.
pub(crate) fn both_ends<'a>(schema: &'a Schema, table: &str) -> Vec<Relation<'a>> {
    let forward = schema.forward_fks(table).iter().map(Relation::source);
    let reverse = schema.reverse_fks_for(table).iter().map(Relation::target);

    forward.chain(reverse).collect()
}
