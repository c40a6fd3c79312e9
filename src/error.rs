use thiserror::Error;

/// Precondition failures, reported before a search starts running.
///
/// Not finding a path is NOT an error, see
/// [`crate::search::SearchOutcome::Exhausted`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Start state {0} is not part of the search space")]
    InvalidStart(String),
    #[error("Goal state {0} is not part of the search space")]
    InvalidGoal(String),
    #[error("Heuristic can't rank start state {state}: {reason}")]
    MismatchedHeuristic { state: String, reason: String },
}
