use std::fmt::Debug;
use std::hash::Hash;

pub use crate::cost::Cost;

/// A label for a transition between two states.
pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}

/// One configuration of a problem.
///
/// States are immutable values: two semantically identical states must
/// compare and hash identically no matter how they were produced.
pub trait State: Clone + Debug + PartialEq + Eq + Hash {}

/// One leg of a solution, the action taken and where it led.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub action: A,
    pub state: St,
    /// Cumulative cost from the start up to (and including) this step.
    pub cost: C,
}

/// A path from a start state, as a sequence of steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub start: St,
    pub steps: Vec<Step<St, A, C>>,
    pub cost: C,
}

impl<St, A, C> Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    /// Number of actions in the path.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The last state reached.
    pub fn end(&self) -> &St {
        self.steps.last().map_or(&self.start, |step| &step.state)
    }

    pub fn actions(&self) -> impl Iterator<Item = &A> {
        self.steps.iter().map(|step| &step.action)
    }

    /// All states visited, start included.
    pub fn states(&self) -> impl Iterator<Item = &St> {
        std::iter::once(&self.start).chain(self.steps.iter().map(|step| &step.state))
    }
}

impl<St, A, C> std::fmt::Display for Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Path({}, {:?}:{:?}:{:?})",
            self.cost,
            self.start,
            self.actions().take(20).collect::<Vec<_>>(),
            self.end()
        )
    }
}

/// A state space: which transitions leave a state and what they cost.
pub trait Space<St, A, C>: Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    /// Applies an action, `None` if it's not legal on `s`.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// The incremental cost of taking `a` from `s`.
    ///
    /// Must be non-negative. Uniform by default.
    fn cost(&self, _s: &St, _a: &A) -> C {
        C::one()
    }

    /// Expands a State into every legal `(successor, action)` pair.
    fn neighbours(&self, s: &St) -> Vec<(St, A)>;

    /// Verify is a State belongs to this space.
    fn valid(&self, s: &St) -> bool;

    /// Re-plays a path checking every transition and the cumulative costs.
    fn valid_path(&self, p: &Path<St, A, C>) -> bool {
        if !self.valid(&p.start) {
            return false;
        }
        let mut state = p.start.clone();
        let mut cost = C::zero();
        for step in &p.steps {
            match self.apply(&state, &step.action) {
                Some(next) if next == step.state => {
                    cost = cost.saturating_add(&self.cost(&state, &step.action));
                    if cost != step.cost {
                        return false;
                    }
                    state = next;
                }
                _ => return false,
            }
        }
        cost == p.cost
    }
}
