//! Record store: the dataset plus its persisted mirror

use crate::storage::traits::{DatasetStorage, StorageResult};
use crate::storage::{Dataset, ExamKey, ExamRecord, ExamReference, UpsertOutcome};

/// Owns the in-memory dataset and writes it back through a backend
///
/// The in-memory dataset is authoritative. A failed flush leaves the store
/// dirty, so the next `flush_if_dirty` writes the full dataset again.
pub struct RecordStore<S: DatasetStorage> {
    backend: S,
    dataset: Dataset,
    dirty: bool,
}

impl<S: DatasetStorage> RecordStore<S> {
    /// Opens the store, falling back to an empty dataset on corrupt content
    pub fn open(backend: S) -> Self {
        let dataset = match backend.load() {
            Ok(dataset) => {
                tracing::info!(
                    "Loaded {} exam records from {}",
                    dataset.len(),
                    backend.describe()
                );
                dataset
            }
            Err(e) => {
                tracing::warn!(
                    "Could not load {} ({}); starting from an empty dataset",
                    backend.describe(),
                    e
                );
                Dataset::new()
            }
        };

        Self {
            backend,
            dataset,
            dirty: false,
        }
    }

    /// Starts with an empty dataset without reading the backend
    ///
    /// The backend content is replaced at the first flush, even when nothing
    /// is upserted.
    pub fn fresh(backend: S) -> Self {
        Self {
            backend,
            dataset: Dataset::new(),
            dirty: true,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn find_by_key(&self, key: &ExamKey) -> Option<&ExamRecord> {
        self.dataset
            .find_by_key(key)
            .and_then(|index| self.dataset.get(index))
    }

    /// Returns true if the detail page for `key` has already been processed
    pub fn is_resolved(&self, key: &ExamKey) -> bool {
        self.find_by_key(key)
            .map(ExamRecord::is_resolved)
            .unwrap_or(false)
    }

    /// Merges `reference` into the dataset; see [`Dataset::upsert`]
    pub fn upsert(
        &mut self,
        reference: &ExamReference,
        documents: Option<Vec<String>>,
    ) -> UpsertOutcome {
        let outcome = self.dataset.upsert(reference, documents);
        if outcome.changed() {
            self.dirty = true;
        }
        outcome
    }

    /// Writes the full dataset to the backend
    pub fn flush(&mut self) -> StorageResult<()> {
        self.backend.save(&self.dataset)?;
        self.dirty = false;
        tracing::debug!(
            "Flushed {} records to {}",
            self.dataset.len(),
            self.backend.describe()
        );
        Ok(())
    }

    /// Flushes only when the dataset changed since the last successful flush
    ///
    /// Returns whether a write happened.
    pub fn flush_if_dirty(&mut self) -> StorageResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }
}
