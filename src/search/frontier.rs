//! Open lists: the nodes discovered but not yet expanded.

use std::collections::VecDeque;
use std::fmt::Debug;

use crate::data_structures::dary_heap::DaryHeap;
use crate::search::node::NodeIndex;
use crate::space::Cost;

/// The open set of a search.
///
/// The driver only needs to push nodes and take the next one out. Which one
/// comes out next is what tells breadth-first and best-first search apart.
pub trait Frontier<C>: Debug
where
    C: Cost,
{
    /// Adds a node with total priority `f = g + h`.
    fn push(&mut self, node: NodeIndex, f: C);
    /// Takes the next node to expand.
    fn pop_best(&mut self) -> Option<NodeIndex>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Bytes currently reserved for entries.
    fn allocated_bytes(&self) -> usize;
}

/// First-in-first-out frontier for breadth-first search.
///
/// Ignores priorities entirely, so it only finds shortest paths when every
/// transition costs the same.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<NodeIndex>,
}

impl FifoFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> Frontier<C> for FifoFrontier
where
    C: Cost,
{
    #[inline(always)]
    fn push(&mut self, node: NodeIndex, _f: C) {
        self.queue.push_back(node);
    }
    #[inline(always)]
    fn pop_best(&mut self) -> Option<NodeIndex> {
        self.queue.pop_front()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.queue.len()
    }
    fn allocated_bytes(&self) -> usize {
        self.queue.capacity() * std::mem::size_of::<NodeIndex>()
    }
}

/// The ranking tuple for best-first search.
///
/// Lower `f` first. Ties go to whichever entry was pushed first, which keeps
/// expansion order deterministic and FIFO within a priority level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank<C: Cost> {
    f: C,
    sequence: u64,
}

impl<C> Rank<C>
where
    C: Cost,
{
    pub fn new(f: C, sequence: u64) -> Self {
        Self { f, sequence }
    }
    pub fn f(&self) -> C {
        self.f
    }
}

/// Heap nodes carry just ranking information and a handle to the actual
/// search node, so sifting moves as little data as possible.
#[derive(Debug, Clone)]
pub struct PriorityEntry<C>
where
    C: Cost,
{
    pub rank: Rank<C>,
    /// Ignored when ranking.
    pub node: NodeIndex,
}

impl<C: Cost> PartialEq for PriorityEntry<C> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<C: Cost> Eq for PriorityEntry<C> {}

impl<C: Cost> PartialOrd for PriorityEntry<C> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<C: Cost> Ord for PriorityEntry<C> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

/// Min-priority frontier for A* and uniform-cost search.
///
/// There's no decrease-key. A state reached again through a cheaper path is
/// simply pushed again, and the driver drops the outdated entry when it
/// surfaces.
#[derive(Debug)]
pub struct PriorityFrontier<C>
where
    C: Cost,
{
    open: DaryHeap<PriorityEntry<C>>,
    next_sequence: u64,
}

impl<C> PriorityFrontier<C>
where
    C: Cost,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            open: DaryHeap::with_capacity(2048),
            next_sequence: 0,
        }
    }

    /// The rank of the next entry to come out.
    pub fn peek_rank(&self) -> Option<Rank<C>> {
        self.open.peek().map(|entry| entry.rank)
    }
}

impl<C> Default for PriorityFrontier<C>
where
    C: Cost,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Frontier<C> for PriorityFrontier<C>
where
    C: Cost,
{
    #[inline(always)]
    fn push(&mut self, node: NodeIndex, f: C) {
        let rank = Rank::new(f, self.next_sequence);
        self.next_sequence += 1;
        self.open.push(PriorityEntry { rank, node });
    }
    #[inline(always)]
    fn pop_best(&mut self) -> Option<NodeIndex> {
        self.open.pop().map(|entry| entry.node)
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.open.len()
    }
    fn allocated_bytes(&self) -> usize {
        self.open.capacity() * std::mem::size_of::<PriorityEntry<C>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::node::SearchNode;
    use crate::search::node::SearchTree;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Spot(u8);
    impl crate::space::State for Spot {}

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Hop;
    impl crate::space::Action for Hop {}

    /// Hands out real `NodeIndex` values for states `Spot(0..n)`.
    fn handles(n: u8) -> (SearchTree<Spot, Hop, u32>, Vec<NodeIndex>) {
        let mut tree = SearchTree::new();
        let handles = (0..n)
            .map(|i| tree.push(SearchNode::new(Spot(i), None, 0, 0)))
            .collect();
        (tree, handles)
    }

    #[test]
    fn ranking() {
        assert!(Rank::new(1u32, 9) < Rank::new(2u32, 0));
        // Same f-value, needs tie-breaking on insertion order
        let early = Rank::new(4u32, 1);
        let late = Rank::new(4u32, 2);
        assert!(early < late);
        assert_eq!(early.f(), late.f());
    }

    #[test]
    fn fifo_ignores_priorities() {
        let (tree, h) = handles(3);
        let mut frontier = FifoFrontier::new();
        Frontier::<u32>::push(&mut frontier, h[0], 30);
        Frontier::<u32>::push(&mut frontier, h[1], 10);
        Frontier::<u32>::push(&mut frontier, h[2], 20);
        assert_eq!(Frontier::<u32>::len(&frontier), 3);

        let order: Vec<u8> = std::iter::from_fn(|| Frontier::<u32>::pop_best(&mut frontier))
            .map(|i| tree[i].state().0)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert!(Frontier::<u32>::is_empty(&frontier));
    }

    #[test]
    fn priority_pops_lowest_f_then_oldest() {
        let (tree, h) = handles(5);
        let mut frontier = PriorityFrontier::<u32>::new();
        frontier.push(h[0], 7);
        frontier.push(h[1], 3);
        frontier.push(h[2], 7);
        frontier.push(h[3], 1);
        frontier.push(h[4], 3);
        assert_eq!(frontier.peek_rank().map(|r| r.f()), Some(1));

        let order: Vec<u8> = std::iter::from_fn(|| frontier.pop_best())
            .map(|i| tree[i].state().0)
            .collect();
        assert_eq!(order, vec![3, 1, 4, 0, 2]);
    }

    #[test]
    fn priority_keeps_duplicate_handles() {
        let (_tree, h) = handles(1);
        let mut frontier = PriorityFrontier::<u32>::new();
        frontier.push(h[0], 5);
        frontier.push(h[0], 2);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pop_best(), Some(h[0]));
        assert_eq!(frontier.pop_best(), Some(h[0]));
        assert_eq!(frontier.pop_best(), None);
    }
}
