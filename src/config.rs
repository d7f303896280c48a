//! Pipeline configuration, loaded from YAML and overridable from the CLI

use crate::classify::{Policy, PolicyError};
use crate::storage::{DataFiles, JsonStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid log level '{0}'")]
    LogLevel(String),
}

/// Where the pipeline keeps its documents and which policy it applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding every persisted document
    pub data_dir: PathBuf,
    pub files: DataFiles,
    /// Policy YAML; the embedded tables apply when absent
    pub policy: Option<PathBuf>,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
    /// Reject graph labels outside the policy's taxonomies
    pub strict_taxonomy: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            files: DataFiles::default(),
            policy: None,
            log_level: "info".to_string(),
            strict_taxonomy: false,
        }
    }
}

/// Default data directory (~/.local/share/papergraph)
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"))
        .join("papergraph")
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config file; relative paths inside it resolve against its directory
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&yaml)?;

        if let Some(base) = path.parent() {
            if config.data_dir.is_relative() {
                config.data_dir = base.join(&config.data_dir);
            }
            if let Some(policy) = config.policy.as_mut() {
                if policy.is_relative() {
                    *policy = base.join(&*policy);
                }
            }
        }
        Ok(config)
    }

    /// The configured policy, or the embedded default
    pub fn load_policy(&self) -> Result<Policy, PolicyError> {
        match &self.policy {
            Some(path) => Policy::from_yaml_file(path),
            None => Ok(Policy::default()),
        }
    }

    pub fn open_store(&self) -> StorageResult<JsonStore> {
        JsonStore::with_files(&self.data_dir, self.files.clone())
    }

    pub fn level(&self) -> Result<tracing::Level, ConfigError> {
        tracing::Level::from_str(&self.log_level).map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}
