//! Local file storage.
//!
//! Handles the files the dashboard and the fetch tool read and write:
//! - Demo and saved match documents (pretty JSON, sorted keys)
//! - The API key file
//! - Harvested match and included-asset dumps

mod json;

pub use json::*;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("API key file is empty: {0}")]
    EmptyKeyFile(PathBuf),
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        StorageError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn demo_data_path(&self) -> PathBuf {
        self.data_dir.join("demo-data.json")
    }

    pub fn saved_matches_dir(&self) -> PathBuf {
        self.data_dir.join("saved_matches")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read the API key from the first line of a text file.
pub fn read_api_key(path: &Path) -> Result<String, StorageError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    let key = contents.lines().next().map(str::trim).unwrap_or_default();
    if key.is_empty() {
        return Err(StorageError::EmptyKeyFile(path.to_path_buf()));
    }
    Ok(key.to_string())
}
