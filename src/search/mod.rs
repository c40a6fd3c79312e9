//! The search kernel.
//!
//! A single driver, [`driver::Search`], runs every kind of search. Breadth-first
//! and A* only differ in the frontier and explored-set strategies plugged in.

use derive_more::Display;

use crate::error::SearchError;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::problem::ZeroHeuristic;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

pub mod driver;
pub mod explored;
pub mod frontier;
pub mod node;
pub mod observer;

pub use driver::AStarSearch;
pub use driver::BreadthFirstSearch;
pub use driver::Search;
pub use observer::Expansion;
pub use observer::LogObserver;
pub use observer::SearchObserver;

/// Where a search is in its lifecycle.
///
/// ```text
/// READY -> RUNNING -> SUCCEEDED
///                  -> EXHAUSTED
/// ```
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// Seeded with the start state, nothing popped yet.
    #[display("READY")]
    Ready,
    #[display("RUNNING")]
    Running,
    /// A goal was popped.
    #[display("SUCCEEDED")]
    Succeeded,
    /// The frontier ran dry without reaching a goal.
    #[display("EXHAUSTED")]
    Exhausted,
}

impl SearchStatus {
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Exhausted)
    }
}

/// How a finished search ended.
///
/// Running out of states is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    Found(Path<St, A, C>),
    Exhausted,
}

impl<St, A, C> SearchOutcome<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
    pub fn path(&self) -> Option<&Path<St, A, C>> {
        match self {
            Self::Found(path) => Some(path),
            Self::Exhausted => None,
        }
    }
    pub fn into_path(self) -> Option<Path<St, A, C>> {
        match self {
            Self::Found(path) => Some(path),
            Self::Exhausted => None,
        }
    }
}

/// Counters kept while searching.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Frontier pops, stale or not.
    pub steps: usize,
    /// Pops that went through the goal test.
    pub expanded: usize,
    /// Successors produced by the space.
    pub generated: usize,
    /// Successors dropped because their state was already reached as cheaply.
    pub pruned_duplicates: usize,
    /// Outdated frontier entries skipped when popped.
    pub discarded_stale: usize,
    /// Largest frontier size seen.
    pub frontier_high_water: usize,
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use thousands::Separable;
        write!(
            f,
            "steps={} expanded={} generated={} duplicates={} stale={} max|open|={}",
            self.steps.separate_with_commas(),
            self.expanded.separate_with_commas(),
            self.generated.separate_with_commas(),
            self.pruned_duplicates.separate_with_commas(),
            self.discarded_stale.separate_with_commas(),
            self.frontier_high_water.separate_with_commas(),
        )
    }
}

/// Which search to run, picked at run time.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SearchMode {
    /// FIFO frontier, fewest actions. Assumes uniform costs.
    #[display("breadth-first")]
    #[value(name = "bfs")]
    BreadthFirst,
    /// Priority frontier ranked by `g + h`.
    #[display("A*")]
    #[value(name = "astar")]
    AStar,
    /// Priority frontier ranked by `g` alone, the heuristic is ignored.
    #[display("uniform-cost")]
    #[value(name = "ucs")]
    UniformCost,
}

/// What a call to [`solve`] found, and what it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub mode: SearchMode,
    pub outcome: SearchOutcome<St, A, C>,
    pub stats: SearchStats,
}

/// Runs a search to completion.
///
/// `heuristic` is only consulted in [`SearchMode::AStar`].
pub fn solve<P, H, Sp, St, A, C>(
    problem: P,
    heuristic: H,
    mode: SearchMode,
) -> Result<SearchReport<St, A, C>, SearchError>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    solve_with_observer(problem, heuristic, mode, LogObserver)
}

/// Like [`solve`], telling `observer` about every expansion.
pub fn solve_with_observer<P, H, O, Sp, St, A, C>(
    problem: P,
    heuristic: H,
    mode: SearchMode,
    observer: O,
) -> Result<SearchReport<St, A, C>, SearchError>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    O: SearchObserver<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    let (outcome, stats) = match mode {
        SearchMode::BreadthFirst => {
            let mut search = BreadthFirstSearch::breadth_first(problem)?.with_observer(observer);
            (search.run(), *search.stats())
        }
        SearchMode::AStar => {
            let mut search = AStarSearch::astar(problem, heuristic)?.with_observer(observer);
            (search.run(), *search.stats())
        }
        SearchMode::UniformCost => {
            let mut search = AStarSearch::astar(problem, ZeroHeuristic)?.with_observer(observer);
            (search.run(), *search.stats())
        }
    };
    Ok(SearchReport {
        mode,
        outcome,
        stats,
    })
}
