use nonmax::NonMaxU32;

use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::State;
use crate::space::Step;

/// A handle to a `SearchNode<St, A, C>` in a `SearchTree`.
///
/// Nodes are never removed from the tree, so handles stay valid for the
/// whole search. `NonMax` keeps `Option<NodeIndex>` as wide as a `u32`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(NonMaxU32);

impl NodeIndex {
    #[inline(always)]
    fn new(index: usize) -> Option<Self> {
        let index = u32::try_from(index).ok()?;
        Some(Self(NonMaxU32::new(index)?))
    }

    #[inline(always)]
    pub fn as_usize(&self) -> usize {
        self.0.get() as usize
    }
}

/// A state plus the bookkeeping to rank it and walk back to the root.
#[derive(Debug, Clone)]
pub struct SearchNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub(crate) state: St,
    /// The node this one was reached from, and the action taken.
    ///
    /// Parents are always pushed earlier, so this never forms a cycle.
    pub(crate) parent: Option<(NodeIndex, A)>,
    /// Cost of the path from the root (g).
    pub(crate) g: C,
    /// Estimated cost to the goal (h).
    pub(crate) h: C,
}

impl<St, A, C> SearchNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub fn new(state: St, parent: Option<(NodeIndex, A)>, g: C, h: C) -> Self {
        Self {
            state,
            parent,
            g,
            h,
        }
    }

    #[inline(always)]
    pub fn state(&self) -> &St {
        &self.state
    }
    #[inline(always)]
    pub fn g(&self) -> C {
        self.g
    }
    #[inline(always)]
    pub fn h(&self) -> C {
        self.h
    }
    /// Total priority, `g + h`.
    #[inline(always)]
    pub fn f(&self) -> C {
        self.g.saturating_add(&self.h)
    }
}

/// Arena of every node created during a search.
///
/// Only grows. Dropping it releases the whole tree at once.
pub struct SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    nodes: Vec<SearchNode<St, A, C>>,
}

impl<St, A, C> SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Adds a node, returning its handle.
    ///
    /// Panics after `u32::MAX - 1` nodes, far past any memory budget.
    #[inline(always)]
    pub fn push(&mut self, node: SearchNode<St, A, C>) -> NodeIndex {
        debug_assert!(
            node.parent
                .is_none_or(|(parent, _)| parent.as_usize() < self.nodes.len()),
            "Parents must already be in the tree"
        );
        let index = NodeIndex::new(self.nodes.len())
            .unwrap_or_else(|| panic!("SearchTree is full ({} nodes)", self.nodes.len()));
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Rebuilds the path from the root to `node_index`.
    #[must_use]
    pub fn path(&self, mut node_index: NodeIndex) -> Path<St, A, C> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("PathReconstruction");

        // Walk back to the root collecting steps, then flip them around.
        let mut steps = vec![];
        while let Some((parent_index, a)) = self[node_index].parent {
            debug_assert!(parent_index.as_usize() < node_index.as_usize());
            let node = &self[node_index];
            steps.push(Step {
                action: a,
                state: node.state.clone(),
                cost: node.g,
            });
            node_index = parent_index;
        }
        let root = &self[node_index];
        debug_assert!(root.parent.is_none());
        steps.reverse();

        let cost = steps.last().map_or(root.g, |step| step.cost);
        Path {
            start: root.state.clone(),
            steps,
            cost,
        }
    }
}

impl<St, A, C> Default for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A, C> std::ops::Index<NodeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    type Output = SearchNode<St, A, C>;

    #[inline(always)]
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.as_usize()]
    }
}

impl<St, A, C> std::fmt::Debug for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
