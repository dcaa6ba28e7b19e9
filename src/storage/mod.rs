//! Storage module for persisting exam records
//!
//! This module handles the dataset the crawl accumulates, including:
//! - The record model (`ExamReference`, `ExamRecord`, `DocumentStatus`)
//! - Lookup by composite key and upsert semantics (`Dataset`)
//! - The JSON file backend with atomic whole-file rewrites
//! - The `RecordStore` that pairs the dataset with its backend

mod dataset;
mod json;
mod records;
mod store;
mod traits;

pub use dataset::{Dataset, UpsertOutcome};
pub use json::{write_json_atomic, JsonFileStorage};
pub use records::{DocumentStatus, ExamKey, ExamRecord, ExamReference};
pub use store::RecordStore;
pub use traits::{DatasetStorage, StorageError, StorageResult};

use std::path::Path;

/// Opens the JSON dataset at `path`
///
/// A missing file yields an empty store. A file that cannot be parsed is
/// logged and replaced by an empty dataset at the first flush.
pub fn open_store(path: &Path) -> RecordStore<JsonFileStorage> {
    RecordStore::open(JsonFileStorage::new(path))
}

/// Reads the dataset at `path` without keeping a store around
pub fn load_dataset(path: &Path) -> Dataset {
    open_store(path).into_dataset()
}
