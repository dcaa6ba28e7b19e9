//! Statistics over the exam dataset
//!
//! This module provides functionality for counting records by document
//! status and by source category, and for printing those counts.

use crate::storage::{Dataset, DocumentStatus};
use std::collections::BTreeMap;

/// Dataset statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetStatistics {
    /// Total number of exam records
    pub total_records: u64,

    /// Records whose detail page listed at least one document
    pub with_documents: u64,

    /// Records whose detail page listed no documents
    pub resolved_empty: u64,

    /// Records whose detail page has not been visited yet
    pub unresolved: u64,

    /// Sum of document URLs over all records
    pub total_documents: u64,

    /// Record count by source category
    pub by_category: BTreeMap<String, CategoryCounts>,
}

/// Per-category counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub records: u64,
    pub with_documents: u64,
    pub documents: u64,
}

impl DatasetStatistics {
    /// Share of records that have been resolved, in percent
    pub fn resolved_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        (self.total_records - self.unresolved) as f64 / self.total_records as f64 * 100.0
    }
}

/// Computes statistics for `dataset`
pub fn compute_statistics(dataset: &Dataset) -> DatasetStatistics {
    let mut stats = DatasetStatistics::default();

    for record in dataset {
        stats.total_records += 1;

        let documents = record.documents.urls().len() as u64;
        match record.documents {
            DocumentStatus::Unresolved => stats.unresolved += 1,
            DocumentStatus::ResolvedEmpty => stats.resolved_empty += 1,
            DocumentStatus::ResolvedWithDocuments(_) => stats.with_documents += 1,
        }
        stats.total_documents += documents;

        let category = stats
            .by_category
            .entry(record.reference.source_category.clone())
            .or_default();
        category.records += 1;
        category.documents += documents;
        if documents > 0 {
            category.with_documents += 1;
        }
    }

    stats
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &DatasetStatistics) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!("  Total exams: {}", stats.total_records);
    println!("  With documents: {}", stats.with_documents);
    println!("  Checked, no documents: {}", stats.resolved_empty);
    println!("  Not yet checked: {}", stats.unresolved);
    println!("  Total document links: {}", stats.total_documents);
    println!();

    if !stats.by_category.is_empty() {
        println!("By Category:");
        // Sort categories by record count (descending)
        let mut categories: Vec<_> = stats.by_category.iter().collect();
        categories.sort_by(|a, b| b.1.records.cmp(&a.1.records));

        for (name, counts) in categories {
            println!(
                "  {}: {} exams, {} with documents, {} links",
                name, counts.records, counts.with_documents, counts.documents
            );
        }
        println!();
    }

    println!(
        "Resolved: {:.1}% ({} / {} exams checked)",
        stats.resolved_rate(),
        stats.total_records - stats.unresolved,
        stats.total_records
    );
}
