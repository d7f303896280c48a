//! Flat-file JSON backend
//!
//! One pretty-printed JSON document per file in a data directory. Writes go
//! through a temporary file in the same directory and are renamed into place,
//! so a reader never observes a half-written document.

use super::lock::LockFile;
use super::traits::{PipelineStore, StorageError, StorageResult};
use crate::corpus::{Corpus, Paper, RawRecord, RecordError, SeenSet};
use crate::graph::GraphSnapshot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const LOCK_FILE: &str = ".papergraph.lock";

/// File names of the persisted documents, relative to the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    /// Fetch output, classifier input
    pub raw: String,
    /// Sorted identifier ledger
    pub seen: String,
    /// Records accepted by the latest classify run
    pub accepted: String,
    /// Growing, enriched corpus
    pub corpus: String,
    /// Latest graph snapshot
    pub graph: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            raw: "raw_papers.json".to_string(),
            seen: "seen_papers.json".to_string(),
            accepted: "new_papers.json".to_string(),
            corpus: "enriched_papers.json".to_string(),
            graph: "knowledge_graph.json".to_string(),
        }
    }
}

/// JSON-file store rooted at a data directory
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
    files: DataFiles,
}

impl JsonStore {
    /// Open (creating if needed) a data directory with default file names
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        Self::with_files(dir, DataFiles::default())
    }

    pub fn with_files(dir: impl AsRef<Path>, files: DataFiles) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, files })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &DataFiles {
        &self.files
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl PipelineStore for JsonStore {
    type Guard = LockFile;

    fn lock(&self) -> StorageResult<LockFile> {
        LockFile::acquire(self.path(LOCK_FILE))
    }

    fn load_raw(&self) -> StorageResult<Vec<RawRecord>> {
        let path = self.path(&self.files.raw);
        read_array(&path)?
            .into_iter()
            .enumerate()
            .map(|(position, value)| {
                RawRecord::from_value(position, value).map_err(|source| StorageError::Record {
                    path: path.clone(),
                    source,
                })
            })
            .collect()
    }

    fn load_seen(&self) -> StorageResult<SeenSet> {
        let path = self.path(&self.files.seen);
        Ok(read_document(&path)?.unwrap_or_default())
    }

    fn save_seen(&self, seen: &SeenSet) -> StorageResult<()> {
        write_document(&self.path(&self.files.seen), seen)
    }

    fn load_accepted(&self) -> StorageResult<Vec<Paper>> {
        read_papers(self.path(&self.files.accepted))
    }

    fn save_accepted(&self, papers: &[Paper]) -> StorageResult<()> {
        write_document(&self.path(&self.files.accepted), papers)
    }

    fn load_corpus(&self) -> StorageResult<Corpus> {
        read_papers(self.path(&self.files.corpus)).map(Corpus::from_papers)
    }

    fn save_corpus(&self, corpus: &Corpus) -> StorageResult<()> {
        write_document(&self.path(&self.files.corpus), corpus)
    }

    fn load_graph(&self) -> StorageResult<Option<GraphSnapshot>> {
        read_document(&self.path(&self.files.graph))
    }

    fn save_graph(&self, graph: &GraphSnapshot) -> StorageResult<()> {
        write_document(&self.path(&self.files.graph), graph)
    }
}

/// Read a JSON array of paper records, reporting a bad element by position
///
/// Also used for files produced by the enrichment collaborator.
pub fn read_papers(path: impl AsRef<Path>) -> StorageResult<Vec<Paper>> {
    let path = path.as_ref();
    read_array(path)?
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            serde_json::from_value(value).map_err(|e| StorageError::Record {
                path: path.to_path_buf(),
                source: RecordError::Malformed {
                    position,
                    reason: e.to_string(),
                },
            })
        })
        .collect()
}

fn read_array(path: &Path) -> StorageResult<Vec<Value>> {
    Ok(read_document(path)?.unwrap_or_default())
}

fn read_document<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StorageError::Serialization {
            path: path.to_path_buf(),
            source,
        })
}

fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value).map_err(|source| StorageError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
