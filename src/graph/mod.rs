//! Knowledge graph: keyed nodes, typed edges, snapshot statistics

mod builder;
mod edge;
mod node;
mod snapshot;
mod stats;

#[cfg(test)]
mod tests;

pub use builder::{build_graph, GraphBuilder, GraphError, GraphResult};
pub use edge::{Edge, EdgeType};
pub use node::{normalize_name, Node, NodeKey, NodeKind, NodeProperties, PaperProperties};
pub use snapshot::GraphSnapshot;
pub use stats::{GraphMetadata, TOP_AUTHORS};
