//! GraphSnapshot: the flat, most-recent build of the knowledge graph

use super::edge::{Edge, EdgeType};
use super::node::{Node, NodeKey, NodeKind};
use super::stats::GraphMetadata;
use serde::{Deserialize, Serialize};

/// Nodes, edges and aggregate statistics from one full rebuild
///
/// Nodes are sorted by key, so two builds of the same corpus (in any order)
/// produce identical node lists. Edges follow corpus order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub metadata: GraphMetadata,
}

impl GraphSnapshot {
    /// Look up a node by key
    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.nodes
            .binary_search_by(|n| n.id.cmp(key))
            .ok()
            .map(|i| &self.nodes[i])
    }

    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    pub fn edges_of(&self, relationship: EdgeType) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.relationship == relationship)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges sorted, for comparing edge multisets irrespective of order
    pub fn sorted_edges(&self) -> Vec<Edge> {
        let mut edges = self.edges.clone();
        edges.sort();
        edges
    }
}
