//! Table dependency graph and deterministic topological ordering.

use crate::error::{CoreError, CoreResult};
use crate::metadata::ReferencedTableSet;
use crate::table_name::TableName;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A directed graph of table dependencies.
///
/// An edge R → T means rows of R must exist before rows of T (T references
/// R). Self-referencing foreign keys are recorded in a flagged set rather
/// than as edges, so they never participate in cycle detection; they are
/// handled downstream by two-phase insertion.
#[derive(Debug)]
pub struct TableGraph {
    /// The underlying graph
    graph: DiGraph<TableName, ()>,

    /// Map from table name to node index
    node_map: HashMap<TableName, NodeIndex>,

    /// Tables whose closure contained themselves (self-referencing FK)
    self_refs: BTreeSet<TableName>,
}

impl TableGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            self_refs: BTreeSet::new(),
        }
    }

    /// Add a table node, returning the existing index if already present.
    pub fn add_table(&mut self, table: &TableName) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(table.as_str()) {
            idx
        } else {
            let idx = self.graph.add_node(table.clone());
            self.node_map.insert(table.clone(), idx);
            idx
        }
    }

    /// Record that `table` references `referenced`: rows of `referenced`
    /// must be inserted first. A self-reference is flagged instead of
    /// becoming an edge.
    pub fn add_reference(&mut self, table: &TableName, referenced: &TableName) {
        if table == referenced {
            self.self_refs.insert(table.clone());
            self.add_table(table);
            return;
        }
        let table_idx = self.add_table(table);
        let ref_idx = self.add_table(referenced);
        // One edge per table pair is enough for ordering; composite keys
        // produce the same pair repeatedly.
        if !self.graph.contains_edge(ref_idx, table_idx) {
            self.graph.add_edge(ref_idx, table_idx, ());
        }
    }

    /// Build the graph from each table's referenced-table closure.
    ///
    /// Every table in `closures` becomes a node even when its closure is
    /// empty, so dependency-free tables still appear in the ordering.
    pub fn build(closures: &BTreeMap<TableName, ReferencedTableSet>) -> Self {
        let mut graph = Self::new();

        for table in closures.keys() {
            graph.add_table(table);
        }

        for (table, referenced) in closures {
            for referenced_table in referenced.iter() {
                graph.add_reference(table, referenced_table);
            }
        }

        graph
    }

    /// Tables flagged as self-referencing.
    pub fn self_referencing(&self) -> &BTreeSet<TableName> {
        &self.self_refs
    }

    /// Check if a table exists in the graph
    pub fn contains(&self, table: &TableName) -> bool {
        self.node_map.contains_key(table.as_str())
    }

    /// Number of tables in the graph.
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Whether the graph has no tables.
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Direct references of `table` (the tables it depends on).
    pub fn references_of(&self, table: &TableName) -> Vec<TableName> {
        if let Some(&idx) = self.node_map.get(table.as_str()) {
            self.graph
                .edges_directed(idx, Direction::Incoming)
                .map(|e| self.graph[e.source()].clone())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Direct dependents of `table` (the tables that reference it).
    pub fn dependents_of(&self, table: &TableName) -> Vec<TableName> {
        if let Some(&idx) = self.node_map.get(table.as_str()) {
            self.graph
                .edges_directed(idx, Direction::Outgoing)
                .map(|e| self.graph[e.target()].clone())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Insert order: every table appears after all tables it references.
    ///
    /// Kahn's algorithm with a lexicographic tie-break among simultaneously
    /// eligible tables, so the same working set always yields the same
    /// sequence. A non-empty residual graph is a genuine reference cycle and
    /// fails with [`CoreError::CyclicDependency`] naming the participants.
    pub fn insert_order(&self) -> CoreResult<Vec<TableName>> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                (
                    idx,
                    self.graph.edges_directed(idx, Direction::Incoming).count(),
                )
            })
            .collect();

        let mut ready: BTreeSet<TableName> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&idx, _)| self.graph[idx].clone())
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(table) = ready.pop_first() {
            let idx = self.node_map[table.as_str()];
            for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                let target = edge.target();
                if let Some(deg) = in_degree.get_mut(&target) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert(self.graph[target].clone());
                    }
                }
            }
            order.push(table);
        }

        if order.len() < self.graph.node_count() {
            let mut residual: Vec<&str> = in_degree
                .iter()
                .filter(|(_, &deg)| deg > 0)
                .map(|(&idx, _)| self.graph[idx].as_str())
                .collect();
            residual.sort_unstable();
            return Err(CoreError::CyclicDependency {
                tables: residual.join(", "),
            });
        }

        Ok(order)
    }

    /// Delete order: the exact reverse of [`insert_order`](Self::insert_order),
    /// so dependents are removed before the tables they reference.
    pub fn delete_order(&self) -> CoreResult<Vec<TableName>> {
        let mut order = self.insert_order()?;
        order.reverse();
        Ok(order)
    }
}

impl Default for TableGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
