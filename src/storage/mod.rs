//! Storage backends for the pipeline's persisted documents
//!
//! Stages talk to storage through the `PipelineStore` trait. `JsonStore` is
//! the flat-file backend; `MemoryStore` keeps everything in process.

mod json;
mod lock;
mod memory;
mod traits;

pub use json::{read_papers, DataFiles, JsonStore};
pub use lock::LockFile;
pub use memory::MemoryStore;
pub use traits::{PipelineStore, StorageError, StorageResult};
