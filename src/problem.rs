use std::marker::PhantomData;

use crate::error::SearchError;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Space;
use crate::space::State;

/// A search problem: a space, where to start, and what counts as a goal.
pub trait Problem<Sp, St, A, C>: std::fmt::Debug
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> &St;
    fn is_goal(&self, s: &St) -> bool;

    /// The explicit goal for equality-based problems.
    fn goal(&self) -> Option<&St> {
        None
    }

    /// Checks the problem is well-formed before searching it.
    fn validate(&self) -> Result<(), SearchError> {
        let space = self.space();
        if !space.valid(self.start()) {
            return Err(SearchError::InvalidStart(format!("{:?}", self.start())));
        }
        if let Some(goal) = self.goal() {
            if !space.valid(goal) {
                return Err(SearchError::InvalidGoal(format!("{goal:?}")));
            }
        }
        Ok(())
    }
}

/// An estimate of the remaining cost to reach the goal from a state.
///
/// Heuristics are bound to their goal when built.
///
/// Priority search only returns optimal paths when the heuristic is
/// admissible (never overestimates). This is a caller contract, it's never
/// checked at run time.
pub trait Heuristic<St, C>
where
    St: State,
    C: Cost,
{
    fn h(&self, s: &St) -> C;

    /// Checks the heuristic can rank states like `start` before searching.
    ///
    /// States reachable from `start` are assumed to share its shape.
    fn validate(&self, _start: &St) -> Result<(), SearchError> {
        Ok(())
    }
}

impl<St, C, F> Heuristic<St, C> for F
where
    St: State,
    C: Cost,
    F: Fn(&St) -> C,
{
    #[inline(always)]
    fn h(&self, s: &St) -> C {
        self(s)
    }
}

/// The blind heuristic. Turns A* into uniform-cost search.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl<St, C> Heuristic<St, C> for ZeroHeuristic
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn h(&self, _s: &St) -> C {
        C::zero()
    }
}

/// A problem with a single goal state, tested by equality.
#[derive(Clone, Debug)]
pub struct GoalProblem<Sp, St, A, C>
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    space: Sp,
    start: St,
    goal: St,

    _phantom_action: PhantomData<A>,
    _phantom_cost: PhantomData<C>,
}

impl<Sp, St, A, C> GoalProblem<Sp, St, A, C>
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    pub fn new(space: Sp, start: St, goal: St) -> Self {
        Self {
            space,
            start,
            goal,
            _phantom_action: PhantomData,
            _phantom_cost: PhantomData,
        }
    }
}

impl<Sp, St, A, C> Problem<Sp, St, A, C> for GoalProblem<Sp, St, A, C>
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp {
        &self.space
    }
    fn start(&self) -> &St {
        &self.start
    }
    #[inline(always)]
    fn is_goal(&self, s: &St) -> bool {
        *s == self.goal
    }
    fn goal(&self) -> Option<&St> {
        Some(&self.goal)
    }
}
