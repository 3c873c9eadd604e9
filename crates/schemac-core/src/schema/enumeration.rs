use super::Name;
use crate::{Error, Result};

use serde::{Deserialize, Serialize};

/// An enumeration declared with an `Enum` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// The stored value, e.g. `TOPPERS_TALK`
    pub value: String,

    /// Display alias, e.g. `ToppersTalk`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![],
        }
    }

    /// The member used wherever an emitter has to synthesize a default: the
    /// first value declared with an alias.
    ///
    /// An enum without any aliased value has no default. That is reported as
    /// an error rather than falling back to the first value.
    pub fn default_member(&self) -> Result<&EnumValue> {
        self.values
            .iter()
            .find(|value| value.alias.is_some())
            .ok_or_else(|| Error::missing_enum_default(&self.name))
    }

    pub fn name(&self) -> Name {
        Name::new(&self.name)
    }
}

impl EnumValue {
    /// The identifier the member is generated under: the alias when present,
    /// otherwise the value.
    pub fn member(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.value)
    }
}
