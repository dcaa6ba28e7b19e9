//! Output module for reports derived from the dataset
//!
//! This module handles:
//! - Counting records by document status and category
//! - Exporting per-category files and the document URL index
//! - Generating a markdown summary

mod export;
mod markdown;
pub mod stats;
mod traits;

pub use export::{
    build_url_index, category_file_name, export_all, export_by_category, export_url_index,
    URL_INDEX_FILE,
};
pub use markdown::{format_markdown_summary, generate_markdown_summary, SummaryContext};
pub use stats::{compute_statistics, print_statistics, CategoryCounts, DatasetStatistics};
pub use traits::{OutputError, OutputResult};
