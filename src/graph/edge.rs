//! Typed, directed relations between node keys

use super::node::{NodeKey, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relationship carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// author → paper
    Authored,
    /// paper → domain
    BelongsToDomain,
    /// paper → technique
    UsesTechnique,
    /// paper → representation
    UsesRepresentation,
}

impl EdgeType {
    /// Node kinds this relation connects, as (source, target)
    pub fn endpoints(&self) -> (NodeKind, NodeKind) {
        match self {
            Self::Authored => (NodeKind::Author, NodeKind::Paper),
            Self::BelongsToDomain => (NodeKind::Paper, NodeKind::Domain),
            Self::UsesTechnique => (NodeKind::Paper, NodeKind::Technique),
            Self::UsesRepresentation => (NodeKind::Paper, NodeKind::Representation),
        }
    }
}

/// A directed edge
///
/// Edges are never deduplicated; multiplicity mirrors the corpus.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeKey,
    pub target: NodeKey,
    #[serde(rename = "type")]
    pub relationship: EdgeType,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Edge {
    pub fn new(source: NodeKey, target: NodeKey, relationship: EdgeType) -> Self {
        Self {
            source,
            target,
            relationship,
            properties: BTreeMap::new(),
        }
    }

    /// `authored` edge; carries the author's role
    pub fn authored(author: NodeKey, paper: NodeKey) -> Self {
        Self::new(author, paper, EdgeType::Authored).with_property("role", "author")
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
