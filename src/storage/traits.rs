//! Storage trait definitions

use crate::corpus::{Corpus, Paper, RawRecord, RecordError, SeenSet};
use crate::graph::GraphSnapshot;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: {source}")]
    Record {
        path: PathBuf,
        #[source]
        source: RecordError,
    },

    #[error("Store is locked by another pipeline (remove {0} if no pipeline is running)")]
    Locked(PathBuf),

    #[error("Atomic write failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persisted pipeline state
///
/// Each document is read once at the start of a stage and written once at
/// its end. Missing documents read as empty.
pub trait PipelineStore {
    /// Held for the duration of a stage; dropping it releases the store
    type Guard;

    /// Claim exclusive use of the store
    fn lock(&self) -> StorageResult<Self::Guard>;

    // === Classifier inputs/outputs ===

    fn load_raw(&self) -> StorageResult<Vec<RawRecord>>;

    fn load_seen(&self) -> StorageResult<SeenSet>;

    fn save_seen(&self, seen: &SeenSet) -> StorageResult<()>;

    fn load_accepted(&self) -> StorageResult<Vec<Paper>>;

    fn save_accepted(&self, papers: &[Paper]) -> StorageResult<()>;

    // === Corpus and graph ===

    fn load_corpus(&self) -> StorageResult<Corpus>;

    fn save_corpus(&self, corpus: &Corpus) -> StorageResult<()>;

    fn load_graph(&self) -> StorageResult<Option<GraphSnapshot>>;

    fn save_graph(&self, graph: &GraphSnapshot) -> StorageResult<()>;
}
