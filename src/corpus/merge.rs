//! The accumulated corpus and its append-only merge

use super::record::Paper;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Outcome of merging a batch into the corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Records appended
    pub added: usize,
    /// Records whose identifier was already present
    pub skipped: usize,
}

/// Every accepted (and possibly enriched) record across all runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    papers: Vec<Paper>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing record sequence as loaded from disk
    pub fn from_papers(papers: Vec<Paper>) -> Self {
        Self { papers }
    }

    /// Append records whose identifier is not yet present
    ///
    /// Existing entries always win; within the batch the first occurrence of
    /// an identifier wins. Input order is preserved for appended records.
    pub fn merge(&mut self, batch: impl IntoIterator<Item = Paper>) -> MergeReport {
        let mut ids: HashSet<String> = self.papers.iter().map(|p| p.id.clone()).collect();
        let mut report = MergeReport::default();

        for paper in batch {
            if ids.insert(paper.id.clone()) {
                self.papers.push(paper);
                report.added += 1;
            } else {
                debug!(id = %paper.id, "corpus already holds record; skipping");
                report.skipped += 1;
            }
        }

        report
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn into_papers(self) -> Vec<Paper> {
        self.papers
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.papers.iter().any(|p| p.id == id)
    }
}
