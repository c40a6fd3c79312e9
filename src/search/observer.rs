use crate::space::Cost;
use crate::space::State;

/// Bookkeeping of a node taken out of the frontier and found to be current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion<C>
where
    C: Cost,
{
    /// Number of frontier pops so far, this one included.
    pub step: usize,
    pub g: C,
    pub h: C,
    pub f: C,
    /// Entries left in the frontier after the pop.
    pub frontier_len: usize,
    /// Whether this expansion ends the search.
    pub is_goal: bool,
}

/// Gets told about every expansion, in order.
///
/// Observers only watch. They can't steer the search.
pub trait SearchObserver<St, C>
where
    St: State,
    C: Cost,
{
    fn on_expand(&mut self, state: &St, expansion: &Expansion<C>);
}

impl<St, C, F> SearchObserver<St, C> for F
where
    St: State,
    C: Cost,
    F: FnMut(&St, &Expansion<C>),
{
    #[inline(always)]
    fn on_expand(&mut self, state: &St, expansion: &Expansion<C>) {
        self(state, expansion)
    }
}

/// Forwards expansions to the `log` facade at trace level.
///
/// The default observer. Costs nothing unless trace logging is enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl<St, C> SearchObserver<St, C> for LogObserver
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn on_expand(&mut self, state: &St, e: &Expansion<C>) {
        log::trace!(
            "#{} g={} h={} f={} |open|={}{} {:?}",
            e.step,
            e.g,
            e.h,
            e.f,
            e.frontier_len,
            if e.is_goal { " GOAL" } else { "" },
            state,
        );
    }
}
