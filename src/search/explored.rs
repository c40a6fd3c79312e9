//! Duplicate suppression: which states are still worth exploring.

use std::fmt::Debug;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::space::Cost;
use crate::space::State;

/// Tracks which states were already reached, and how cheaply.
pub trait ExploredSet<St, C>: Debug
where
    St: State,
    C: Cost,
{
    /// Decides whether a freshly generated node deserves a frontier entry.
    ///
    /// A `true` answer records the state as reached at cost `g`.
    fn should_expand(&mut self, s: &St, g: C) -> bool;

    /// Whether a popped entry was superseded by a cheaper path or its state
    /// was already closed.
    fn is_stale(&self, s: &St, g: C) -> bool;

    /// Marks a state as closed after popping its best entry.
    fn finalize(&mut self, s: &St);

    /// Number of distinct states recorded.
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Bytes currently reserved for records.
    fn allocated_bytes(&self) -> usize;
}

/// Membership-only tracker for breadth-first search.
///
/// States are recorded when enqueued, so a state is queued at most once no
/// matter how many predecessors reach it. This also bounds the frontier by
/// the number of distinct states.
#[derive(Debug)]
pub struct EnqueuedSet<St>
where
    St: State,
{
    seen: FxHashSet<St>,
}

impl<St> EnqueuedSet<St>
where
    St: State,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: FxHashSet::default(),
        }
    }

    pub fn contains(&self, s: &St) -> bool {
        self.seen.contains(s)
    }
}

impl<St> Default for EnqueuedSet<St>
where
    St: State,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<St, C> ExploredSet<St, C> for EnqueuedSet<St>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn should_expand(&mut self, s: &St, _g: C) -> bool {
        if self.seen.contains(s) {
            return false;
        }
        self.seen.insert(s.clone())
    }
    #[inline(always)]
    fn is_stale(&self, _s: &St, _g: C) -> bool {
        // Every state has a single entry.
        false
    }
    #[inline(always)]
    fn finalize(&mut self, _s: &St) {}
    fn len(&self) -> usize {
        self.seen.len()
    }
    fn allocated_bytes(&self) -> usize {
        self.seen.capacity() * std::mem::size_of::<St>()
    }
}

/// What's known about a reached state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CostRecord<C>
where
    C: Cost,
{
    /// Cheapest path cost seen so far.
    pub best: C,
    /// Whether the state was already expanded.
    pub closed: bool,
}

/// Best-known cost per state, for A* and uniform-cost search.
///
/// Amalgamation of,
/// - The `HashMap<St, C>` of cheapest `g` per state, used to discard
///   outdated frontier entries lazily.
/// - The "Closed Set" `HashSet<St>`, to never re-expand a state.
///
/// Once closed, a state is never reopened even if a cheaper path shows up.
/// That's exact for consistent heuristics, and an accepted limitation for
/// inconsistent ones.
#[derive(Debug)]
pub struct BestCostMap<St, C>
where
    St: State,
    C: Cost,
{
    records: FxHashMap<St, CostRecord<C>>,
}

impl<St, C> BestCostMap<St, C>
where
    St: State,
    C: Cost,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: FxHashMap::default(),
        }
    }

    pub fn get(&self, s: &St) -> Option<&CostRecord<C>> {
        self.records.get(s)
    }

    pub fn is_closed(&self, s: &St) -> bool {
        self.records.get(s).is_some_and(|r| r.closed)
    }
}

impl<St, C> Default for BestCostMap<St, C>
where
    St: State,
    C: Cost,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<St, C> ExploredSet<St, C> for BestCostMap<St, C>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn should_expand(&mut self, s: &St, g: C) -> bool {
        match self.records.get_mut(s) {
            Some(record) => {
                if record.closed || record.best <= g {
                    return false;
                }
                // Found better path to an open state
                record.best = g;
                true
            }
            None => {
                self.records.insert(
                    s.clone(),
                    CostRecord {
                        best: g,
                        closed: false,
                    },
                );
                true
            }
        }
    }

    #[inline(always)]
    fn is_stale(&self, s: &St, g: C) -> bool {
        match self.records.get(s) {
            Some(record) => record.closed || g > record.best,
            None => {
                debug_assert!(false, "Popped a state that was never recorded");
                true
            }
        }
    }

    #[inline(always)]
    fn finalize(&mut self, s: &St) {
        match self.records.get_mut(s) {
            Some(record) => {
                debug_assert!(!record.closed, "States are only closed once");
                record.closed = true;
            }
            None => {
                unreachable!("Tried closing a state without a record");
            }
        }
    }

    fn len(&self) -> usize {
        self.records.len()
    }
    fn allocated_bytes(&self) -> usize {
        self.records.capacity() * std::mem::size_of::<(St, CostRecord<C>)>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Spot(u8);
    impl State for Spot {}

    #[test]
    fn enqueued_set_admits_each_state_once() {
        let mut seen = EnqueuedSet::<Spot>::new();
        assert!(ExploredSet::<Spot, u32>::should_expand(&mut seen, &Spot(1), 5));
        assert!(!ExploredSet::<Spot, u32>::should_expand(&mut seen, &Spot(1), 0));
        assert!(ExploredSet::<Spot, u32>::should_expand(&mut seen, &Spot(2), 5));
        assert!(!ExploredSet::<Spot, u32>::is_stale(&seen, &Spot(1), 99));
        assert_eq!(ExploredSet::<Spot, u32>::len(&seen), 2);
        assert!(seen.contains(&Spot(2)));
    }

    #[test]
    fn best_cost_map_only_admits_improvements() {
        let mut best = BestCostMap::<Spot, u32>::new();
        assert!(best.should_expand(&Spot(1), 10));
        assert!(!best.should_expand(&Spot(1), 10), "Equal cost is no news");
        assert!(!best.should_expand(&Spot(1), 12));
        assert!(best.should_expand(&Spot(1), 7));
        assert_eq!(best.get(&Spot(1)).map(|r| r.best), Some(7));

        // The entry pushed at 10 is now outdated, the one at 7 is not.
        assert!(best.is_stale(&Spot(1), 10));
        assert!(!best.is_stale(&Spot(1), 7));
    }

    #[test]
    fn closed_states_are_never_reopened() {
        let mut best = BestCostMap::<Spot, u32>::new();
        assert!(best.should_expand(&Spot(3), 4));
        best.finalize(&Spot(3));
        assert!(best.is_closed(&Spot(3)));

        assert!(!best.should_expand(&Spot(3), 1));
        assert!(best.is_stale(&Spot(3), 4));
        assert_eq!(best.len(), 1);
    }

    #[test]
    fn zero_cost_cycles_terminate() {
        // Re-reaching a state at the same cost must not requeue it.
        let mut best = BestCostMap::<Spot, u32>::new();
        assert!(best.should_expand(&Spot(0), 0));
        assert!(best.should_expand(&Spot(1), 0));
        assert!(!best.should_expand(&Spot(0), 0));
        assert!(!best.should_expand(&Spot(1), 0));
    }
}
