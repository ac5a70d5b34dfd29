//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Storage item kind scanned for the snapshot document
    pub memory_kind: String,
    /// Value of `content.type` identifying the snapshot document
    pub snapshot_type: String,
    /// Data directory for on-disk storage adapters
    pub data_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_kind: "memory".to_string(),
            snapshot_type: "graph".to_string(),
            data_path: PathBuf::from("./knowgraph_data"),
        }
    }
}

impl EngineConfig {
    /// Parse a YAML document; absent keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}
