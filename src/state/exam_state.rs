/// Exam reference state definitions
use std::fmt;

/// Represents the current state of one exam reference within a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExamState {
    /// Found on a listing page, store not yet consulted
    Discovered,

    /// Store already holds resolved documents; only listing fields refreshed
    SkippedCached,

    /// Detail page was visited (successfully or not)
    DetailFetched,

    /// Result upserted into the store and flushed
    Merged,
}

impl ExamState {
    /// Returns true if the transition `self -> next` is allowed
    pub fn can_transition_to(&self, next: ExamState) -> bool {
        matches!(
            (self, next),
            (Self::Discovered, Self::SkippedCached)
                | (Self::Discovered, Self::DetailFetched)
                | (Self::DetailFetched, Self::Merged)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::SkippedCached => "skipped_cached",
            Self::DetailFetched => "detail_fetched",
            Self::Merged => "merged",
        }
    }
}

impl fmt::Display for ExamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
