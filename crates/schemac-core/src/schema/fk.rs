use crate::{Diagnostics, Error, Result};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A relationship declared with an `FK` line.
///
/// The source column holds the database constraint. Which side embeds the
/// other when serializing outward is decided separately by [`ReferDirection`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,

    #[serde(rename = "type")]
    pub relationship: Relationship,

    pub refer: ReferDirection,

    /// Field name on the source side, typed by the target
    pub left_alias: String,

    /// Field name on the target side, typed by the source
    pub right_alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    #[default]
    ManyToOne,
    OneToMany,
    OneToOne,
    ManyToMany,
}

/// Which end of a relationship gets the embedded field in the transfer and
/// client layers.
///
/// Each relation embeds on one side only. Embedding on both sides of every
/// pair would recurse without bound when serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReferDirection {
    /// The source table embeds the target under the left alias
    #[serde(rename = "refer_left")]
    Left,

    /// The target table embeds the source under the right alias
    #[default]
    #[serde(rename = "refer_right")]
    Right,
}

/// The shape of a relationship field on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Singular, optional
    One,

    /// Ordered collection
    Many,
}

impl ForeignKey {
    /// Parses a single `FK ...` line.
    ///
    /// Unrecognized tags are defaulted and reported to `diagnostics`.
    pub fn parse(line: &str, diagnostics: &mut Diagnostics) -> Result<ForeignKey> {
        crate::parse::fk::parse(1, line, diagnostics)
    }

    /// `Users.group_id`
    pub fn source_path(&self) -> String {
        format!("{}.{}", self.source_table, self.source_column)
    }

    /// `Groups.id`
    pub fn target_path(&self) -> String {
        format!("{}.{}", self.target_table, self.target_column)
    }

    pub fn is_self_referential(&self) -> bool {
        self.source_table == self.target_table
    }

    /// Shape of the left-alias field on the source side
    pub fn source_shape(&self) -> Shape {
        self.relationship.source_shape()
    }

    /// Shape of the right-alias field on the target side
    pub fn target_shape(&self) -> Shape {
        self.relationship.target_shape()
    }
}

impl Relationship {
    pub fn source_shape(self) -> Shape {
        match self {
            Relationship::ManyToOne | Relationship::OneToOne => Shape::One,
            Relationship::OneToMany | Relationship::ManyToMany => Shape::Many,
        }
    }

    pub fn target_shape(self) -> Shape {
        match self {
            Relationship::ManyToOne | Relationship::ManyToMany => Shape::Many,
            Relationship::OneToMany | Relationship::OneToOne => Shape::One,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::ManyToOne => "many_to_one",
            Relationship::OneToMany => "one_to_many",
            Relationship::OneToOne => "one_to_one",
            Relationship::ManyToMany => "many_to_many",
        }
    }
}

impl ReferDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferDirection::Left => "refer_left",
            ReferDirection::Right => "refer_right",
        }
    }
}

impl FromStr for Relationship {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "many_to_one" => Relationship::ManyToOne,
            "one_to_many" => Relationship::OneToMany,
            "one_to_one" => Relationship::OneToOne,
            "many_to_many" => Relationship::ManyToMany,
            _ => bail!("unknown relationship kind `{s}`"),
        })
    }
}

impl FromStr for ReferDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "refer_left" => ReferDirection::Left,
            "refer_right" => ReferDirection::Right,
            _ => bail!("unknown referer direction `{s}`"),
        })
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ReferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the foreign key back as a fully explicit `FK` line.
impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FK {} as {} -> {} as {} [{}] [{}]",
            self.source_path(),
            self.left_alias,
            self.target_path(),
            self.right_alias,
            self.relationship,
            self.refer
        )
    }
}

impl FromStr for ForeignKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ForeignKey::parse(s, &mut Diagnostics::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_invert_across_sides() {
        use Relationship::*;

        assert_eq!(ManyToOne.source_shape(), Shape::One);
        assert_eq!(ManyToOne.target_shape(), Shape::Many);
        assert_eq!(OneToMany.source_shape(), Shape::Many);
        assert_eq!(OneToMany.target_shape(), Shape::One);
        assert_eq!(OneToOne.source_shape(), Shape::One);
        assert_eq!(OneToOne.target_shape(), Shape::One);
        assert_eq!(ManyToMany.source_shape(), Shape::Many);
        assert_eq!(ManyToMany.target_shape(), Shape::Many);
    }

    #[test]
    fn display_is_reparseable() {
        let line = "FK Users.group_id as group -> Groups.id as members [one_to_one] [refer_left]";
        let fk: ForeignKey = line.parse().unwrap();

        let again: ForeignKey = fk.to_string().parse().unwrap();
        assert_eq!(fk, again);
    }

    #[test]
    fn tags_serialize_in_schema_spelling() {
        assert_eq!(
            serde_json::to_string(&Relationship::ManyToMany).unwrap(),
            "\"many_to_many\""
        );
        assert_eq!(
            serde_json::to_string(&ReferDirection::Left).unwrap(),
            "\"refer_left\""
        );
    }
}
