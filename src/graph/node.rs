//! Node representation in the knowledge graph

use crate::corpus::Paper;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of entity a node stands for
///
/// Declaration order is the sort order of snapshot nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Paper,
    Author,
    Domain,
    Technique,
    Representation,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Paper,
        NodeKind::Author,
        NodeKind::Domain,
        NodeKind::Technique,
        NodeKind::Representation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Author => "author",
            Self::Domain => "domain",
            Self::Technique => "technique",
            Self::Representation => "representation",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown node kind '{}'", s))
    }
}

/// Normalize a display name into the name part of a node key
///
/// Case is preserved. Surrounding whitespace is dropped, every inner
/// whitespace run becomes one `_`, and `/` becomes `_`.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace('/', "_")
}

/// Collapse whitespace without touching anything else; used for display names
pub(crate) fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Node identity: kind plus normalized name
///
/// Serializes as `"<kind>:<name>"`, e.g. `"author:A._Smith"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeKey {
    kind: NodeKind,
    name: String,
}

impl NodeKey {
    /// Build a key, normalizing `name`
    pub fn new(kind: NodeKind, name: &str) -> Self {
        Self {
            kind,
            name: normalize_name(name),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The normalized name part
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

impl From<NodeKey> for String {
    fn from(key: NodeKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for NodeKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (kind, name) = s
            .split_once(':')
            .ok_or_else(|| format!("node key '{}' lacks a kind prefix", s))?;
        Ok(Self {
            kind: kind.parse()?,
            name: name.to_string(),
        })
    }
}

/// Core fields of a paper, as carried on its node
///
/// Ordered field by field; duplicate ids in a corpus keep the smallest bag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaperProperties {
    pub arxiv_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub published_date: String,
    pub pdf_link: String,
    pub citation_count: u64,
    pub venue: String,
    pub year: String,
}

impl From<&Paper> for PaperProperties {
    fn from(paper: &Paper) -> Self {
        Self {
            arxiv_id: paper.id.clone(),
            title: paper.title.clone(),
            abstract_text: paper.abstract_text.clone(),
            published_date: paper.published_date.clone(),
            pdf_link: paper.pdf_link.clone(),
            citation_count: paper.citation_count(),
            venue: paper.venue().to_string(),
            year: paper.year(),
        }
    }
}

/// Attribute bag; its shape depends on the node kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeProperties {
    Paper(PaperProperties),
    Named { name: String },
}

/// A node in the knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeKey,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub properties: NodeProperties,
}

impl Node {
    pub fn paper(paper: &Paper) -> Self {
        Self {
            id: NodeKey::new(NodeKind::Paper, &paper.id),
            kind: NodeKind::Paper,
            properties: NodeProperties::Paper(PaperProperties::from(paper)),
        }
    }

    /// An author/domain/technique/representation node
    pub fn named(kind: NodeKind, name: &str) -> Self {
        Self {
            id: NodeKey::new(kind, name),
            kind,
            properties: NodeProperties::Named {
                name: collapse_whitespace(name),
            },
        }
    }

    /// Display name: the title for papers, the name otherwise
    pub fn display_name(&self) -> &str {
        match &self.properties {
            NodeProperties::Paper(p) => &p.title,
            NodeProperties::Named { name } => name,
        }
    }
}
