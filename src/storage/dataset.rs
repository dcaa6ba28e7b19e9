//! In-memory dataset of exam records

use crate::storage::{DocumentStatus, ExamKey, ExamRecord, ExamReference};

/// What an upsert did to the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record had the key; a new one was appended
    Inserted,

    /// An unresolved record received its documents
    Resolved,

    /// Listing fields merged; documents untouched
    Refreshed { changed: bool },
}

impl UpsertOutcome {
    /// Returns true if the dataset differs from before the upsert
    pub fn changed(&self) -> bool {
        match self {
            Self::Inserted | Self::Resolved => true,
            Self::Refreshed { changed } => *changed,
        }
    }
}

/// Insertion-ordered collection of exam records, unique by `ExamKey`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<ExamRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dataset from records in file order
    ///
    /// Records sharing a key collapse onto the first occurrence. A later
    /// duplicate only contributes its documents when the first one is still
    /// unresolved. Returns the dataset and the number of collapsed records.
    pub fn from_records(records: Vec<ExamRecord>) -> (Self, usize) {
        let mut dataset = Self::new();
        let mut collapsed = 0;

        for record in records {
            match dataset.find_by_key(&record.key()) {
                Some(index) => {
                    collapsed += 1;
                    let existing = &mut dataset.records[index];
                    if !existing.is_resolved() && record.is_resolved() {
                        existing.documents = record.documents;
                    }
                }
                None => dataset.records.push(record),
            }
        }

        (dataset, collapsed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ExamRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExamRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ExamRecord> {
        self.records.get(index)
    }

    /// Linear scan for the record with `key`
    pub fn find_by_key(&self, key: &ExamKey) -> Option<usize> {
        self.records.iter().position(|record| record.has_key(key))
    }

    /// Merges `reference` into the dataset
    ///
    /// - key present, record resolved: listing fields merged, documents kept
    /// - key present, record unresolved: listing fields merged, documents set
    ///   when `documents` is `Some`
    /// - key absent: a record is appended, unresolved when `documents` is `None`
    pub fn upsert(
        &mut self,
        reference: &ExamReference,
        documents: Option<Vec<String>>,
    ) -> UpsertOutcome {
        match self.find_by_key(&reference.key()) {
            Some(index) => {
                let record = &mut self.records[index];
                let changed = record.merge_reference(reference);

                match documents {
                    Some(urls) if !record.is_resolved() => {
                        record.documents = DocumentStatus::resolved(urls);
                        UpsertOutcome::Resolved
                    }
                    _ => UpsertOutcome::Refreshed { changed },
                }
            }
            None => {
                let status = documents
                    .map(DocumentStatus::resolved)
                    .unwrap_or_default();
                self.records.push(ExamRecord::new(reference.clone(), status));
                UpsertOutcome::Inserted
            }
        }
    }
}

impl IntoIterator for Dataset {
    type Item = ExamRecord;
    type IntoIter = std::vec::IntoIter<ExamRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a ExamRecord;
    type IntoIter = std::slice::Iter<'a, ExamRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
