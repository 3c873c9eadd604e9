use super::FkIndex;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Ordered table pairs that take part in a foreign-key dependency cycle.
///
/// Only used to decide whether a foreign-key constraint between two tables
/// must be deferred at creation time. The set never rejects a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircularDeps {
    pairs: BTreeSet<(String, String)>,
}

impl CircularDeps {
    /// Computes the cycle pairs of the table dependency graph.
    ///
    /// Each table has an edge to every distinct target in its forward foreign
    /// keys; self-loops are kept. A depth-first traversal runs from every
    /// table not yet visited, with one visited set shared across the whole
    /// graph. Low-link bookkeeping unwinds the current path so that a table
    /// which reaches the path through an already finished table is still
    /// counted as a member. Every ordered pair within a group of members is
    /// recorded, which makes the result a closure over the graph: adding an
    /// edge can only add pairs.
    pub fn detect<'a>(tables: impl IntoIterator<Item = &'a str>, forward: &'a FkIndex) -> Self {
        let graph = dependency_graph(tables, forward);

        let mut traversal = Traversal {
            graph: &graph,
            index: HashMap::new(),
            low: HashMap::new(),
            path: vec![],
            on_path: HashSet::new(),
            pairs: BTreeSet::new(),
        };

        for &table in graph.keys() {
            if !traversal.index.contains_key(table) {
                traversal.visit(table);
            }
        }

        tracing::debug!(
            pairs = traversal.pairs.len(),
            "detected circular dependencies"
        );

        Self {
            pairs: traversal.pairs,
        }
    }

    /// Returns `true` if `(from, to)` is in the set.
    pub fn contains(&self, from: &str, to: &str) -> bool {
        // BTreeSet lookups need an owned tuple; the set stays small.
        self.pairs.contains(&(from.to_string(), to.to_string()))
    }

    /// Returns `true` if either `(a, b)` or `(b, a)` is in the set. A
    /// constraint between the two tables must then be deferred.
    pub fn involves(&self, a: &str, b: &str) -> bool {
        self.contains(a, b) || self.contains(b, a)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(String, String)> for CircularDeps {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

type Graph<'a> = IndexMap<&'a str, IndexSet<&'a str>>;

/// Declared tables come first, in declaration order, then any table that
/// only appears in a foreign key.
fn dependency_graph<'a>(
    tables: impl IntoIterator<Item = &'a str>,
    forward: &'a FkIndex,
) -> Graph<'a> {
    let mut graph = Graph::new();

    for table in tables {
        graph.entry(table).or_default();
    }

    for fk in forward.all() {
        graph
            .entry(fk.source_table.as_str())
            .or_default()
            .insert(fk.target_table.as_str());
        graph.entry(fk.target_table.as_str()).or_default();
    }

    graph
}

struct Traversal<'a, 'g> {
    graph: &'g Graph<'a>,

    /// Discovery order of every visited table
    index: HashMap<&'a str, usize>,

    /// Lowest discovery index reachable while the table is on the path
    low: HashMap<&'a str, usize>,

    path: Vec<&'a str>,
    on_path: HashSet<&'a str>,
    pairs: BTreeSet<(String, String)>,
}

impl<'a> Traversal<'a, '_> {
    fn visit(&mut self, table: &'a str) {
        let discovered = self.index.len();
        self.index.insert(table, discovered);
        self.low.insert(table, discovered);
        self.path.push(table);
        self.on_path.insert(table);

        let graph = self.graph;
        for &next in graph.get(table).into_iter().flatten() {
            if !self.index.contains_key(next) {
                self.visit(next);
                let low = self.low[table].min(self.low[next]);
                self.low.insert(table, low);
            } else if self.on_path.contains(next) {
                let low = self.low[table].min(self.index[next]);
                self.low.insert(table, low);
            }
        }

        if self.low[table] != discovered {
            return;
        }

        // `table` roots a group: unwind the path back to it.
        let mut group = vec![];
        while let Some(member) = self.path.pop() {
            self.on_path.remove(member);
            group.push(member);
            if member == table {
                break;
            }
        }

        let self_loop = graph.get(table).is_some_and(|edges| edges.contains(table));
        if group.len() == 1 && !self_loop {
            return;
        }

        for &from in &group {
            for &to in &group {
                self.pairs.insert((from.to_string(), to.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ForeignKey, ReferDirection, Relationship};

    fn fk(source: &str, target: &str) -> ForeignKey {
        ForeignKey {
            source_table: source.to_string(),
            source_column: format!("{}_id", target.to_lowercase()),
            target_table: target.to_string(),
            target_column: "id".to_string(),
            relationship: Relationship::ManyToOne,
            refer: ReferDirection::Right,
            left_alias: target.to_lowercase(),
            right_alias: source.to_lowercase(),
        }
    }

    fn detect(edges: &[(&str, &str)]) -> CircularDeps {
        let mut forward = FkIndex::new();
        for (source, target) in edges {
            forward.push(source, fk(source, target));
        }
        CircularDeps::detect([], &forward)
    }

    #[test]
    fn acyclic_graph_has_no_pairs() {
        let deps = detect(&[
            ("Users", "Groups"),
            ("Posts", "Users"),
            ("Posts", "Groups"),
        ]);
        assert!(deps.is_empty());
    }

    #[test]
    fn self_reference() {
        let deps = detect(&[("Tasks", "Tasks")]);
        assert!(deps.contains("Tasks", "Tasks"));
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn three_table_cycle_records_every_pair() {
        let deps = detect(&[("A", "B"), ("B", "C"), ("C", "A")]);

        for from in ["A", "B", "C"] {
            for to in ["A", "B", "C"] {
                assert!(deps.contains(from, to), "missing ({from}, {to})");
            }
        }
    }

    #[test]
    fn member_reached_through_finished_table() {
        // P -> A -> P closes first; W is only reached afterwards and its
        // way back to P runs through A, which is already finished.
        let deps = detect(&[("P", "A"), ("P", "W"), ("A", "P"), ("W", "A")]);

        assert!(deps.involves("P", "W"));
        assert!(deps.involves("W", "A"));
    }

    #[test]
    fn tables_outside_the_cycle_are_not_marked() {
        let deps = detect(&[("Entry", "A"), ("A", "B"), ("B", "A"), ("B", "Leaf")]);

        assert!(deps.involves("A", "B"));
        assert!(!deps.involves("Entry", "A"));
        assert!(!deps.involves("B", "Leaf"));
    }

    #[test]
    fn adding_an_edge_keeps_existing_pairs() {
        let before = detect(&[("A", "B"), ("B", "A"), ("C", "D")]);
        let after = detect(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "A")]);

        for (from, to) in before.iter() {
            assert!(after.contains(from, to), "lost ({from}, {to})");
        }
    }
}
