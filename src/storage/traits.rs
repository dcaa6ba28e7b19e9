//! Storage traits and error types
//!
//! This module defines the trait interface for dataset backends and
//! associated error types.

use crate::storage::Dataset;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt dataset at {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for dataset backend implementations
///
/// A backend reads and writes the whole dataset at once. `save` must not
/// leave a truncated or half-written copy behind when it fails.
pub trait DatasetStorage {
    /// Loads the persisted dataset
    ///
    /// A missing backing file is not an error and yields an empty dataset.
    /// Content that cannot be parsed yields `StorageError::Corrupt`.
    fn load(&self) -> StorageResult<Dataset>;

    /// Replaces the persisted dataset with `dataset`
    fn save(&self, dataset: &Dataset) -> StorageResult<()>;

    /// Human-readable location used in log lines
    fn describe(&self) -> String;
}
