//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of the dataset,
//! including status counts and a per-category breakdown.

use crate::output::stats::DatasetStatistics;
use crate::output::traits::OutputResult;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Context printed in the summary header
#[derive(Debug, Clone)]
pub struct SummaryContext {
    pub generated_at: DateTime<Utc>,
    pub dataset_path: String,
    pub config_hash: Option<String>,
}

/// Generates a markdown summary and writes it to `output_path`
pub fn generate_markdown_summary(
    stats: &DatasetStatistics,
    context: &SummaryContext,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats, context);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, markdown)?;

    Ok(())
}

/// Formats dataset statistics as markdown
pub fn format_markdown_summary(stats: &DatasetStatistics, context: &SummaryContext) -> String {
    let mut md = String::new();

    md.push_str("# Exam-Harvest Dataset Summary\n\n");

    md.push_str("## Dataset Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        context.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Dataset**: {}\n", context.dataset_path));
    if let Some(hash) = &context.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Exams**: {}\n", stats.total_records));
    md.push_str(&format!(
        "- **Total Document Links**: {}\n",
        stats.total_documents
    ));
    md.push_str(&format!(
        "- **Resolved**: {:.2}%\n\n",
        stats.resolved_rate()
    ));

    md.push_str("## Document Status\n\n");
    md.push_str("| Status | Exams |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| With documents | {} |\n", stats.with_documents));
    md.push_str(&format!("| No documents | {} |\n", stats.resolved_empty));
    md.push_str(&format!("| Not yet checked | {} |\n\n", stats.unresolved));

    if !stats.by_category.is_empty() {
        md.push_str("## By Category\n\n");
        md.push_str("| Category | Exams | With documents | Links |\n");
        md.push_str("|----------|-------|----------------|-------|\n");

        for (name, counts) in &stats.by_category {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                name, counts.records, counts.with_documents, counts.documents
            ));
        }
        md.push('\n');
    }

    md
}
