//! Undirected node graph built from node records.
//!
//! [`NodeGraph`] wraps a `petgraph` [`UnGraph`] whose node weights are the
//! record identifiers. Edges carry no data; an edge is added once per
//! unordered pair, whichever side lists the connection.
//!
//! Two kinds of irregular input are absorbed rather than rejected:
//!
//! - Records sharing an id map to a single graph node.
//! - A connection naming an id without a record creates an *implicit* node
//!   which is laid out like any other but has no record of its own.

use indexmap::IndexMap;
use log::{debug, warn};
use petgraph::{
    graph::{NodeIndex, UnGraph},
    visit::EdgeRef,
};

use crate::record::NodeRecord;

/// Undirected graph of node identifiers.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    graph: UnGraph<String, ()>,
    indices: IndexMap<String, NodeIndex>,
    implicit_count: usize,
}

impl NodeGraph {
    /// Build the graph for `records`.
    ///
    /// All record ids are inserted first, in input order, so node indices
    /// follow the input; implicit nodes come after them.
    pub fn from_records(records: &[NodeRecord]) -> Self {
        let mut graph = Self::default();

        for record in records {
            graph.insert_node(record.id());
        }
        let declared = graph.node_count();

        for record in records {
            let source = graph.insert_node(record.id());
            for target in record.connections() {
                let target = match graph.index_of(target) {
                    Some(index) => index,
                    None => {
                        warn!(
                            source = record.id(),
                            unknown = target.as_str();
                            "Connection references an unknown node, adding it implicitly"
                        );
                        graph.insert_node(target)
                    }
                };
                graph.graph.update_edge(source, target, ());
            }
        }

        graph.implicit_count = graph.node_count() - declared;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            implicit = graph.implicit_count;
            "Built node graph"
        );
        graph
    }

    fn insert_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.indices.get(id) {
            return index;
        }
        let index = self.graph.add_node(id.to_string());
        self.indices.insert(id.to_string(), index);
        index
    }

    /// Number of distinct nodes, implicit ones included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct undirected edges, self-loops included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of nodes created for connections without a record.
    pub fn implicit_count(&self) -> usize {
        self.implicit_count
    }

    /// Looks up the node index of `id`.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.indices.get(id).copied()
    }

    /// Returns the identifier stored at `index`.
    pub fn id(&self, index: NodeIndex) -> Option<&str> {
        self.graph.node_weight(index).map(String::as_str)
    }

    /// Iterates over node indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Iterates over edges as pairs of node indices.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target()))
    }

    /// Returns true if an edge joins `a` and `b` in either direction.
    pub fn contains_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.graph.find_edge(a, b).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, connections: &[&str]) -> NodeRecord {
        NodeRecord::new(id, connections.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_mutual_connections_yield_one_edge() {
        let graph = NodeGraph::from_records(&[record("A", &["B"]), record("B", &["A"])]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let a = graph.index_of("A").unwrap();
        let b = graph.index_of("B").unwrap();
        assert!(graph.contains_edge(a, b));
        assert!(graph.contains_edge(b, a));
    }

    #[test]
    fn test_node_indices_follow_input_order() {
        let graph = NodeGraph::from_records(&[
            record("c", &[]),
            record("a", &["c"]),
            record("b", &[]),
        ]);

        let ids: Vec<&str> = graph
            .node_indices()
            .map(|index| graph.id(index).unwrap())
            .collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_self_loop_is_kept() {
        let graph = NodeGraph::from_records(&[record("A", &["A"])]);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        let a = graph.index_of("A").unwrap();
        assert_eq!(graph.edges().collect::<Vec<_>>(), [(a, a)]);
    }

    #[test]
    fn test_duplicate_ids_share_a_node() {
        let graph = NodeGraph::from_records(&[
            record("A", &["B"]),
            record("B", &[]),
            record("A", &["C"]),
            record("C", &[]),
        ]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.implicit_count(), 0);
    }

    #[test]
    fn test_unknown_target_becomes_implicit_node() {
        let graph = NodeGraph::from_records(&[record("A", &["ghost"])]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.implicit_count(), 1);
        let ghost = graph.index_of("ghost").unwrap();
        assert_eq!(ghost.index(), 1);
        assert!(graph.contains_edge(graph.index_of("A").unwrap(), ghost));
    }

    #[test]
    fn test_empty_input() {
        let graph = NodeGraph::from_records(&[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
