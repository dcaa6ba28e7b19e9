//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `TargetState`: Progress of one role target (listing page plus its exams)
//! - `ExamState`: Progress of one exam reference discovered on a listing page

mod exam_state;
mod target_state;

// Re-export main types
pub use exam_state::ExamState;
pub use target_state::TargetState;
