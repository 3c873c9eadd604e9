use super::Name;

use serde::{Deserialize, Serialize};

/// A capability signature declared with a `Protocol` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    pub name: String,
    pub methods: Vec<ProtocolMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMethod {
    pub name: String,
    pub return_type: String,
}

impl Protocol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: vec![],
        }
    }

    pub fn name(&self) -> Name {
        Name::new(&self.name)
    }
}
