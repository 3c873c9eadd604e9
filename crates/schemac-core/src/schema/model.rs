use super::Name;

use serde::{Deserialize, Serialize};

/// A client-side composite model declared with a `Model` block.
///
/// Composite models are not backed by a table. They may declare conformance
/// to one or more protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeModel {
    pub name: String,

    /// Protocols named after `extends`, in declaration order
    #[serde(default)]
    pub parents: Vec<String>,

    pub fields: Vec<ModelField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelField {
    pub property: String,

    /// Declared type token, looked up in the emitter's type table
    pub ty: String,

    /// Human display label. Empty when the schema says `NOFORM`.
    #[serde(default)]
    pub label: String,
}

impl CompositeModel {
    pub fn new(name: impl Into<String>, parents: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parents,
            fields: vec![],
        }
    }

    /// Fields that carry display metadata
    pub fn labeled_fields(&self) -> impl Iterator<Item = &ModelField> + '_ {
        self.fields.iter().filter(|field| field.has_label())
    }

    pub fn name(&self) -> Name {
        Name::new(&self.name)
    }
}

impl ModelField {
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }
}
