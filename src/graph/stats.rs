//! Aggregate statistics derived during a graph build

use super::node::{Node, NodeKey, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Number of authors kept in `top_authors`
pub const TOP_AUTHORS: usize = 10;

/// Snapshot-level counts and distributions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub total_papers: usize,
    pub total_authors: usize,
    pub total_domains: usize,
    pub total_techniques: usize,
    pub total_representations: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// `[name, paper count]`, most prolific first
    pub top_authors: Vec<(String, usize)>,
    pub domain_distribution: BTreeMap<String, usize>,
    pub technique_distribution: BTreeMap<String, usize>,
    pub representation_distribution: BTreeMap<String, usize>,
}

impl GraphMetadata {
    pub fn total_for(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Paper => self.total_papers,
            NodeKind::Author => self.total_authors,
            NodeKind::Domain => self.total_domains,
            NodeKind::Technique => self.total_techniques,
            NodeKind::Representation => self.total_representations,
        }
    }
}

/// Running counters fed by the builder, one call per contributed edge
#[derive(Debug, Default)]
pub(crate) struct StatsAccumulator {
    /// Author keys in first-encountered order, with counts
    authors: Vec<(NodeKey, usize)>,
    author_slots: HashMap<NodeKey, usize>,
    /// Label counts keyed like the nodes they point at
    labels: BTreeMap<NodeKey, usize>,
}

impl StatsAccumulator {
    pub fn count_author(&mut self, key: &NodeKey) {
        match self.author_slots.get(key) {
            Some(&slot) => self.authors[slot].1 += 1,
            None => {
                self.author_slots.insert(key.clone(), self.authors.len());
                self.authors.push((key.clone(), 1));
            }
        }
    }

    /// Count one domain, technique or representation occurrence
    pub fn count_label(&mut self, key: &NodeKey) {
        if matches!(key.kind(), NodeKind::Paper | NodeKind::Author) {
            return;
        }
        *self.labels.entry(key.clone()).or_insert(0) += 1;
    }

    /// Produce metadata for the finished node map and edge count
    pub fn finish(self, nodes: &BTreeMap<NodeKey, Node>, total_edges: usize) -> GraphMetadata {
        let mut per_kind: HashMap<NodeKind, usize> = HashMap::new();
        for key in nodes.keys() {
            *per_kind.entry(key.kind()).or_insert(0) += 1;
        }
        let total = |kind: NodeKind| per_kind.get(&kind).copied().unwrap_or(0);

        // Stable: equal counts keep first-encountered order
        let mut authors = self.authors;
        authors.sort_by(|a, b| b.1.cmp(&a.1));
        let top_authors = authors
            .into_iter()
            .take(TOP_AUTHORS)
            .map(|(key, count)| (display_name(nodes, &key), count))
            .collect();

        let mut domain_distribution = BTreeMap::new();
        let mut technique_distribution = BTreeMap::new();
        let mut representation_distribution = BTreeMap::new();
        for (key, count) in self.labels {
            let map = match key.kind() {
                NodeKind::Domain => &mut domain_distribution,
                NodeKind::Technique => &mut technique_distribution,
                NodeKind::Representation => &mut representation_distribution,
                NodeKind::Paper | NodeKind::Author => continue,
            };
            *map.entry(display_name(nodes, &key)).or_insert(0) += count;
        }

        GraphMetadata {
            total_papers: total(NodeKind::Paper),
            total_authors: total(NodeKind::Author),
            total_domains: total(NodeKind::Domain),
            total_techniques: total(NodeKind::Technique),
            total_representations: total(NodeKind::Representation),
            total_nodes: nodes.len(),
            total_edges,
            top_authors,
            domain_distribution,
            technique_distribution,
            representation_distribution,
        }
    }
}

fn display_name(nodes: &BTreeMap<NodeKey, Node>, key: &NodeKey) -> String {
    nodes
        .get(key)
        .map(|n| n.display_name().to_string())
        .unwrap_or_else(|| key.name().to_string())
}
