//! In-process store, used by tests and embedders that manage their own files

use super::traits::{PipelineStore, StorageResult};
use crate::corpus::{Corpus, Paper, RawRecord, SeenSet};
use crate::graph::GraphSnapshot;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    raw: Vec<RawRecord>,
    seen: SeenSet,
    accepted: Vec<Paper>,
    corpus: Corpus,
    graph: Option<GraphSnapshot>,
    writes: usize,
}

/// Store keeping every document in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose raw-record document holds `records`
    pub fn with_raw(records: Vec<RawRecord>) -> Self {
        let store = Self::new();
        store.set_raw(records);
        store
    }

    /// Replace the raw-record document, as the fetch collaborator would
    pub fn set_raw(&self, records: Vec<RawRecord>) {
        self.state().raw = records;
    }

    /// Number of documents written so far
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-write; the data is still usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PipelineStore for MemoryStore {
    type Guard = ();

    fn lock(&self) -> StorageResult<()> {
        Ok(())
    }

    fn load_raw(&self) -> StorageResult<Vec<RawRecord>> {
        Ok(self.state().raw.clone())
    }

    fn load_seen(&self) -> StorageResult<SeenSet> {
        Ok(self.state().seen.clone())
    }

    fn save_seen(&self, seen: &SeenSet) -> StorageResult<()> {
        let mut state = self.state();
        state.seen = seen.clone();
        state.writes += 1;
        Ok(())
    }

    fn load_accepted(&self) -> StorageResult<Vec<Paper>> {
        Ok(self.state().accepted.clone())
    }

    fn save_accepted(&self, papers: &[Paper]) -> StorageResult<()> {
        let mut state = self.state();
        state.accepted = papers.to_vec();
        state.writes += 1;
        Ok(())
    }

    fn load_corpus(&self) -> StorageResult<Corpus> {
        Ok(self.state().corpus.clone())
    }

    fn save_corpus(&self, corpus: &Corpus) -> StorageResult<()> {
        let mut state = self.state();
        state.corpus = corpus.clone();
        state.writes += 1;
        Ok(())
    }

    fn load_graph(&self) -> StorageResult<Option<GraphSnapshot>> {
        Ok(self.state().graph.clone())
    }

    fn save_graph(&self, graph: &GraphSnapshot) -> StorageResult<()> {
        let mut state = self.state();
        state.graph = Some(graph.clone());
        state.writes += 1;
        Ok(())
    }
}
