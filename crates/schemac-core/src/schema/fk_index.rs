use super::ForeignKey;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Foreign keys bucketed by table name.
///
/// The schema keeps two of these over the same set of foreign keys: the
/// forward index keyed by source table and the reverse index keyed by target
/// table. Buckets and their contents keep parse order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FkIndex {
    buckets: IndexMap<String, Vec<ForeignKey>>,
}

impl FkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, table: &str, fk: ForeignKey) {
        self.buckets.entry(table.to_string()).or_default().push(fk);
    }

    /// Foreign keys in `table`'s bucket. Empty when the table has none.
    pub fn get(&self, table: &str) -> &[ForeignKey] {
        self.buckets.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, table: &str, fk: &ForeignKey) -> bool {
        self.get(table).contains(fk)
    }

    /// Bucket keys, in first-insertion order
    pub fn tables(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ForeignKey])> + '_ {
        self.buckets
            .iter()
            .map(|(table, fks)| (table.as_str(), fks.as_slice()))
    }

    /// Every foreign key across all buckets
    pub fn all(&self) -> impl Iterator<Item = &ForeignKey> + '_ {
        self.buckets.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
