/// Role target state definitions
///
/// A target moves from `Pending` to `ListingFetched` once its listing page
/// produced at least one exam reference, and from there to `ExamsDone`.
/// A listing that yields nothing after all retries ends in `ListingFailed`.
use std::fmt;

/// Represents the current state of a role target in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetState {
    /// Listing page not yet requested
    Pending,

    /// Listing page produced exam references that are being processed
    ListingFetched,

    /// Every exam reference of the target was merged or skipped
    ExamsDone,

    /// Listing page was unreachable or had no rows
    ListingFailed,
}

impl TargetState {
    /// Returns true if the transition `self -> next` is allowed
    pub fn can_transition_to(&self, next: TargetState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::ListingFetched)
                | (Self::Pending, Self::ListingFailed)
                | (Self::ListingFetched, Self::ExamsDone)
        )
    }

    /// Short label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ListingFetched => "listing_fetched",
            Self::ExamsDone => "exams_done",
            Self::ListingFailed => "listing_failed",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
