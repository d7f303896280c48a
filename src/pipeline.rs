//! Pipeline stages over a `PipelineStore`
//!
//! Each stage takes the store lock, reads its inputs once, computes
//! everything in memory, and only then writes. A failing stage leaves every
//! document at its pre-run state, so a retry is safe.

use crate::classify::{ClassifyError, ClassifyReport, Classifier, Policy, PolicyError};
use crate::config::ConfigError;
use crate::corpus::{MergeReport, Paper};
use crate::graph::{GraphBuilder, GraphError, GraphMetadata, GraphSnapshot};
use crate::storage::{PipelineStore, StorageError};
use thiserror::Error;
use tracing::info;

/// Errors that abort a pipeline stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Classification failed: {0}")]
    Classify(#[from] ClassifyError),

    #[error("Graph build failed: {0}")]
    Graph(#[from] GraphError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("record #{position} ({id}) is not classified; refusing to merge it into the corpus")]
    Untagged { position: usize, id: String },
}

/// Result type for pipeline stages
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Summary of a full `run`
#[derive(Debug, Clone)]
pub struct RunReport {
    pub classify: ClassifyReport,
    pub merge: MergeReport,
    pub corpus_size: usize,
    pub graph: GraphMetadata,
}

/// Classifier and graph builder wired to a store
pub struct Pipeline<S: PipelineStore> {
    store: S,
    classifier: Classifier,
    builder: GraphBuilder,
}

impl<S: PipelineStore> Pipeline<S> {
    /// Compile `policy` and attach an unchecked graph builder
    pub fn new(store: S, policy: &Policy) -> PipelineResult<Self> {
        Ok(Self {
            store,
            classifier: Classifier::new(policy)?,
            builder: GraphBuilder::new(),
        })
    }

    pub fn with_builder(mut self, builder: GraphBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Classify the raw records; writes the accepted records, then the seen-set
    pub fn classify(&self) -> PipelineResult<ClassifyReport> {
        let _guard = self.store.lock()?;

        let raw = self.store.load_raw()?;
        let seen = self.store.load_seen()?;
        info!(raw = raw.len(), seen = seen.len(), "classifying raw records");

        let outcome = self.classifier.classify(raw, &seen)?;

        self.store.save_accepted(&outcome.accepted)?;
        self.store.save_seen(&outcome.seen)?;
        Ok(outcome.report)
    }

    /// Merge the latest accepted records into the corpus
    pub fn merge(&self) -> PipelineResult<MergeReport> {
        let _guard = self.store.lock()?;
        let accepted = self.store.load_accepted()?;
        self.merge_locked(accepted)
    }

    /// Merge records produced elsewhere (typically the enrichment output)
    pub fn merge_papers(&self, papers: Vec<Paper>) -> PipelineResult<MergeReport> {
        let _guard = self.store.lock()?;
        self.merge_locked(papers)
    }

    fn merge_locked(&self, papers: Vec<Paper>) -> PipelineResult<MergeReport> {
        ensure_tagged(&papers)?;

        let mut corpus = self.store.load_corpus()?;
        let report = corpus.merge(papers);
        if report.added > 0 {
            self.store.save_corpus(&corpus)?;
        }

        info!(added = report.added, skipped = report.skipped, corpus = corpus.len(), "corpus merged");
        Ok(report)
    }

    /// Rebuild the graph snapshot from the full corpus
    pub fn build(&self) -> PipelineResult<GraphSnapshot> {
        let _guard = self.store.lock()?;
        let corpus = self.store.load_corpus()?;
        let graph = self.builder.build(corpus.papers())?;
        self.store.save_graph(&graph)?;
        Ok(graph)
    }

    /// Classify, merge and rebuild in one locked pass
    ///
    /// Writes happen only after every computation succeeded, in the order
    /// accepted → corpus → seen-set → graph. Should a write fail part-way,
    /// a rerun re-accepts the same records and the keyed merge absorbs them.
    pub fn run(&self) -> PipelineResult<RunReport> {
        let _guard = self.store.lock()?;

        let raw = self.store.load_raw()?;
        let seen = self.store.load_seen()?;
        let mut corpus = self.store.load_corpus()?;

        let outcome = self.classifier.classify(raw, &seen)?;
        let merge = corpus.merge(outcome.accepted.iter().cloned());
        let graph = self.builder.build(corpus.papers())?;

        self.store.save_accepted(&outcome.accepted)?;
        self.store.save_corpus(&corpus)?;
        self.store.save_seen(&outcome.seen)?;
        self.store.save_graph(&graph)?;

        info!(
            accepted = outcome.report.accepted,
            corpus = corpus.len(),
            nodes = graph.metadata.total_nodes,
            edges = graph.metadata.total_edges,
            "pipeline run finished"
        );

        Ok(RunReport {
            classify: outcome.report,
            merge,
            corpus_size: corpus.len(),
            graph: graph.metadata,
        })
    }
}

fn ensure_tagged(papers: &[Paper]) -> PipelineResult<()> {
    match papers.iter().position(|p| !p.is_tagged()) {
        Some(position) => Err(PipelineError::Untagged {
            position,
            id: papers[position].id.clone(),
        }),
        None => Ok(()),
    }
}
