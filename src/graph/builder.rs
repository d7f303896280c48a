//! GraphBuilder: total rebuild of the knowledge graph from the corpus

use super::edge::{Edge, EdgeType};
use super::node::{Node, NodeKey, NodeKind, NodeProperties};
use super::snapshot::GraphSnapshot;
use super::stats::StatsAccumulator;
use crate::classify::{Policy, PolicyError, TableKind};
use crate::corpus::Paper;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a graph build
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("record #{position} ({id}): missing classification field `{field}`; record bypassed the classifier")]
    MissingTag {
        position: usize,
        id: String,
        field: &'static str,
    },

    #[error("record #{position} ({id}): classification field `{field}` is empty")]
    EmptyTag {
        position: usize,
        id: String,
        field: &'static str,
    },

    #[error("record #{position} ({id}): {source}")]
    Taxonomy {
        position: usize,
        id: String,
        #[source]
        source: PolicyError,
    },
}

/// Result type for graph builds
pub type GraphResult<T> = Result<T, GraphError>;

/// Classification fields of one record, checked for presence
struct Tags<'a> {
    domain: &'a str,
    techniques: &'a [String],
    representations: &'a [String],
}

/// Derives nodes, edges and statistics from the full corpus
///
/// Holds no state between builds: every call replays the corpus from scratch.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    /// When set, every label must be assignable by this policy
    taxonomy: Option<Policy>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject labels the policy's taxonomies cannot produce
    pub fn with_taxonomy(policy: &Policy) -> Self {
        Self {
            taxonomy: Some(policy.clone()),
        }
    }

    /// Build a snapshot from the corpus, in one pass
    pub fn build(&self, corpus: &[Paper]) -> GraphResult<GraphSnapshot> {
        let mut nodes: BTreeMap<NodeKey, Node> = BTreeMap::new();
        let mut edges: Vec<Edge> = Vec::new();
        let mut stats = StatsAccumulator::default();

        for (position, paper) in corpus.iter().enumerate() {
            let tags = self.tags(position, paper)?;

            let paper_node = Node::paper(paper);
            let paper_key = paper_node.id.clone();
            match nodes.entry(paper_key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(paper_node);
                }
                Entry::Occupied(mut slot) => {
                    warn!(id = %paper.id, position, "duplicate paper in corpus");
                    // Smallest attribute bag wins, whatever the corpus order
                    let smaller = matches!(
                        (&paper_node.properties, &slot.get().properties),
                        (NodeProperties::Paper(new), NodeProperties::Paper(kept)) if new < kept
                    );
                    if smaller {
                        slot.insert(paper_node);
                    }
                }
            }

            for author in &paper.authors {
                let author_key = insert_named(&mut nodes, NodeKind::Author, author);
                stats.count_author(&author_key);
                edges.push(Edge::authored(author_key, paper_key.clone()));
            }

            let domain_key = insert_named(&mut nodes, NodeKind::Domain, tags.domain);
            stats.count_label(&domain_key);
            edges.push(Edge::new(paper_key.clone(), domain_key, EdgeType::BelongsToDomain));

            for technique in tags.techniques {
                let key = insert_named(&mut nodes, NodeKind::Technique, technique);
                stats.count_label(&key);
                edges.push(Edge::new(paper_key.clone(), key, EdgeType::UsesTechnique));
            }

            for representation in tags.representations {
                let key = insert_named(&mut nodes, NodeKind::Representation, representation);
                stats.count_label(&key);
                edges.push(Edge::new(paper_key.clone(), key, EdgeType::UsesRepresentation));
            }
        }

        let metadata = stats.finish(&nodes, edges.len());
        info!(
            papers = metadata.total_papers,
            authors = metadata.total_authors,
            nodes = metadata.total_nodes,
            edges = metadata.total_edges,
            "knowledge graph built"
        );

        Ok(GraphSnapshot {
            nodes: nodes.into_values().collect(),
            edges,
            metadata,
        })
    }

    fn tags<'a>(&self, position: usize, paper: &'a Paper) -> GraphResult<Tags<'a>> {
        let missing = |field| GraphError::MissingTag {
            position,
            id: paper.id.clone(),
            field,
        };
        let empty = |field| GraphError::EmptyTag {
            position,
            id: paper.id.clone(),
            field,
        };

        let domain = paper.domain.as_deref().ok_or_else(|| missing("domain"))?;
        let techniques = paper.techniques.as_deref().ok_or_else(|| missing("techniques"))?;
        let representations = paper
            .representations
            .as_deref()
            .ok_or_else(|| missing("representations"))?;

        if domain.trim().is_empty() {
            return Err(empty("domain"));
        }
        if techniques.is_empty() {
            return Err(empty("techniques"));
        }
        if representations.is_empty() {
            return Err(empty("representations"));
        }

        if let Some(policy) = &self.taxonomy {
            let check = |table, label: &str| {
                policy.require_category(table, label).map_err(|source| GraphError::Taxonomy {
                    position,
                    id: paper.id.clone(),
                    source,
                })
            };
            check(TableKind::Domain, domain)?;
            for technique in techniques {
                check(TableKind::Technique, technique)?;
            }
            for representation in representations {
                check(TableKind::Representation, representation)?;
            }
        }

        Ok(Tags {
            domain,
            techniques,
            representations,
        })
    }
}

/// Insert a named node on first occurrence and return its key
///
/// Textual variants collapsing onto one key keep the lexicographically
/// smallest display name, so the result does not depend on corpus order.
fn insert_named(nodes: &mut BTreeMap<NodeKey, Node>, kind: NodeKind, name: &str) -> NodeKey {
    let node = Node::named(kind, name);
    let key = node.id.clone();
    match nodes.entry(key.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(node);
        }
        Entry::Occupied(mut slot) => {
            if node.display_name() < slot.get().display_name() {
                slot.get_mut().properties = NodeProperties::Named {
                    name: node.display_name().to_string(),
                };
            }
        }
    }
    key
}

/// Build a snapshot with the default, unchecked builder
pub fn build_graph(corpus: &[Paper]) -> GraphResult<GraphSnapshot> {
    GraphBuilder::new().build(corpus)
}
