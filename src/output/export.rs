//! Derived JSON exports of the dataset
//!
//! - one `<category>_exams.json` per source category, holding the records
//!   of that category that have documents
//! - `exam_pdf_urls.json`, mapping `"position - agency - year"` to the
//!   document URLs of that exam

use crate::output::traits::OutputResult;
use crate::storage::{write_json_atomic, Dataset, ExamRecord};
use crate::url::category_file_stem;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the URL index inside the export directory
pub const URL_INDEX_FILE: &str = "exam_pdf_urls.json";

/// File name of the per-category export for `category`
pub fn category_file_name(category: &str) -> String {
    format!("{}_exams.json", category_file_stem(category))
}

/// Writes one file per source category into `dir`
///
/// Categories whose file names fold to the same stem share one file.
/// Returns the paths written, in file name order.
pub fn export_by_category(dataset: &Dataset, dir: &Path) -> OutputResult<Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<&ExamRecord>> = BTreeMap::new();
    for record in dataset
        .iter()
        .filter(|record| !record.documents.urls().is_empty())
    {
        groups
            .entry(category_file_name(&record.reference.source_category))
            .or_default()
            .push(record);
    }

    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(groups.len());
    for (file_name, records) in groups {
        let path = dir.join(file_name);
        write_json_atomic(&path, &records)?;
        tracing::debug!("Wrote {} records to {}", records.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

/// Builds the `"position - agency - year"` to document URLs index
pub fn build_url_index(dataset: &Dataset) -> BTreeMap<String, Vec<String>> {
    dataset
        .iter()
        .filter(|record| !record.documents.urls().is_empty())
        .map(|record| (record.key().to_string(), record.documents.urls().to_vec()))
        .collect()
}

/// Writes the URL index to `dir/exam_pdf_urls.json`
pub fn export_url_index(dataset: &Dataset, dir: &Path) -> OutputResult<PathBuf> {
    let path = dir.join(URL_INDEX_FILE);
    let index = build_url_index(dataset);
    write_json_atomic(&path, &index)?;
    tracing::debug!("Wrote {} index entries to {}", index.len(), path.display());
    Ok(path)
}

/// Writes every export into `dir`
pub fn export_all(dataset: &Dataset, dir: &Path) -> OutputResult<Vec<PathBuf>> {
    let mut written = export_by_category(dataset, dir)?;
    written.push(export_url_index(dataset, dir)?);
    tracing::info!("Exported {} files to {}", written.len(), dir.display());
    Ok(written)
}
