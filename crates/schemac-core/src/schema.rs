mod builder;
pub use builder::Builder;

mod column;
pub use column::{Column, Modifier};

mod cycles;
pub use cycles::CircularDeps;

mod enumeration;
pub use enumeration::{Enum, EnumValue};

mod fk;
pub use fk::{ForeignKey, ReferDirection, Relationship, Shape};

mod fk_index;
pub use fk_index::FkIndex;

mod model;
pub use model::{CompositeModel, ModelField};

mod name;
pub use name::{accessor_ident, type_ident, Name};

mod protocol;
pub use protocol::{Protocol, ProtocolMethod};

mod table;
pub use table::Table;

mod ty;
pub use ty::Type;

mod verify;

use crate::{Diagnostics, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The resolved intermediate representation of a schema.
///
/// Produced once per run by parsing and resolving schema text, then handed
/// read-only to every emitter. All collections keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: IndexMap<String, Table>,
    pub enums: IndexMap<String, Enum>,
    pub models: IndexMap<String, CompositeModel>,
    pub protocols: IndexMap<String, Protocol>,

    /// Foreign keys bucketed by source table
    pub foreign_keys: FkIndex,

    /// The same foreign keys bucketed by target table
    pub reverse_fks: FkIndex,

    pub circular_deps: CircularDeps,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Parses and resolves schema text, discarding diagnostics after they
    /// have been logged.
    pub fn parse(src: &str) -> Result<Schema> {
        Schema::parse_with_diagnostics(src, &mut Diagnostics::new())
    }

    /// Parses and resolves schema text. Non-fatal problems are pushed to
    /// `diagnostics`; the first structural error stops the parse.
    pub fn parse_with_diagnostics(src: &str, diagnostics: &mut Diagnostics) -> Result<Schema> {
        crate::parse::parse(src, diagnostics)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enum> {
        self.enums.get(name)
    }

    /// Foreign keys where `table` is the source
    pub fn forward_fks(&self, table: &str) -> &[ForeignKey] {
        self.foreign_keys.get(table)
    }

    /// Foreign keys where `table` is the target
    pub fn reverse_fks_for(&self, table: &str) -> &[ForeignKey] {
        self.reverse_fks.get(table)
    }

    /// Whether the constraint on `fk` has to be deferred because its two
    /// tables depend on each other.
    pub fn is_deferred(&self, fk: &ForeignKey) -> bool {
        self.circular_deps
            .involves(&fk.source_table, &fk.target_table)
    }

    /// Composite models that declare conformance to `protocol`
    pub fn conforming_models<'a>(
        &'a self,
        protocol: &'a str,
    ) -> impl Iterator<Item = &'a CompositeModel> + 'a {
        self.models
            .values()
            .filter(move |model| model.parents.iter().any(|parent| parent == protocol))
    }
}
