//! JSON file storage implementation
//!
//! The dataset lives in a single pretty-printed JSON array. Every save
//! rewrites the whole file through a temporary sibling that is renamed over
//! the target, so readers only ever see the previous or the new content.

use crate::storage::traits::{DatasetStorage, StorageError, StorageResult};
use crate::storage::{Dataset, ExamRecord};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// JSON array file backend
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetStorage for JsonFileStorage {
    fn load(&self) -> StorageResult<Dataset> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "{} not found, starting with an empty dataset",
                    self.path.display()
                );
                return Ok(Dataset::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<ExamRecord> =
            serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let (dataset, collapsed) = Dataset::from_records(records);
        if collapsed > 0 {
            tracing::warn!(
                "{} held {} records with duplicate keys; merged onto first occurrence",
                self.path.display(),
                collapsed
            );
        }

        Ok(dataset)
    }

    fn save(&self, dataset: &Dataset) -> StorageResult<()> {
        write_json_atomic(&self.path, dataset.records())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serializes `value` as pretty JSON and atomically replaces `path` with it
///
/// Missing parent directories are created. Non-ASCII text is written as-is.
pub fn write_json_atomic<T: serde::Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let temp = NamedTempFile::new_in(&dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}
