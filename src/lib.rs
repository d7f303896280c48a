//! papergraph: a curated research-paper corpus and its knowledge graph
//!
//! Raw paper records from a literature feed pass through a keyword
//! classifier that accepts or rejects each one and tags accepted papers with
//! one domain plus technique and representation labels. The accumulated
//! corpus is then folded into a knowledge graph snapshot with deduplicated
//! nodes and aggregate statistics.
//!
//! # Core Concepts
//!
//! - **Seen-set**: append-only ledger of evaluated identifiers; a paper is
//!   evaluated exactly once across all runs
//! - **Policy**: ordered keyword tables driving exclusion, inclusion and tagging
//! - **Snapshot**: the graph is rebuilt from the full corpus on every build
//!
//! # Example
//!
//! ```
//! use papergraph::{build_graph, classify, Policy, RawRecord, SeenSet};
//!
//! let record = RawRecord {
//!     id: Some("1234".into()),
//!     title: Some("A BREP Transformer for CAD Generation".into()),
//!     abstract_text: Some("We use a transformer on boundary representation graphs.".into()),
//!     authors: Some(vec!["A. Smith".into()]),
//!     published_date: Some("2024-01-01".into()),
//!     pdf_link: Some("https://arxiv.org/pdf/1234".into()),
//!     ..Default::default()
//! };
//!
//! let outcome = classify(vec![record], &SeenSet::new(), &Policy::default()).unwrap();
//! let graph = build_graph(&outcome.accepted).unwrap();
//! assert_eq!(graph.metadata.total_papers, 1);
//! ```

pub mod classify;
pub mod config;
pub mod corpus;
pub mod graph;
pub mod pipeline;
pub mod storage;

pub use classify::{classify, Classifier, ClassifyError, ClassifyOutcome, Decision, Policy, PolicyError};
pub use config::{ConfigError, PipelineConfig};
pub use corpus::{Classification, Corpus, Paper, RawRecord, RecordError, SeenSet};
pub use graph::{build_graph, Edge, EdgeType, GraphBuilder, GraphError, GraphSnapshot, Node, NodeKey, NodeKind};
pub use pipeline::{Pipeline, PipelineError, PipelineResult, RunReport};
pub use storage::{JsonStore, MemoryStore, PipelineStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
