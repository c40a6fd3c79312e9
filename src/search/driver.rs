use std::fmt::Debug;
use std::marker::PhantomData;

use crate::error::SearchError;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::problem::ZeroHeuristic;
use crate::search::SearchOutcome;
use crate::search::SearchStats;
use crate::search::SearchStatus;
use crate::search::explored::BestCostMap;
use crate::search::explored::EnqueuedSet;
use crate::search::explored::ExploredSet;
use crate::search::frontier::FifoFrontier;
use crate::search::frontier::Frontier;
use crate::search::frontier::PriorityFrontier;
use crate::search::node::NodeIndex;
use crate::search::node::SearchNode;
use crate::search::node::SearchTree;
use crate::search::observer::Expansion;
use crate::search::observer::LogObserver;
use crate::search::observer::SearchObserver;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Space;
use crate::space::State;

/// Breadth-first search. Shortest in number of actions, costs are ignored.
pub type BreadthFirstSearch<P, Sp, St, A, C, O = LogObserver> =
    Search<P, ZeroHeuristic, FifoFrontier, EnqueuedSet<St>, Sp, St, A, C, O>;

/// A* search. Cheapest path as long as `H` is admissible.
pub type AStarSearch<P, H, Sp, St, A, C, O = LogObserver> =
    Search<P, H, PriorityFrontier<C>, BestCostMap<St, C>, Sp, St, A, C, O>;

/// The search loop, shared by every mode.
///
/// What kind of search this is depends on the injected strategies,
/// - `F: Frontier<C>` decides which node is expanded next.
/// - `X: ExploredSet<St, C>` decides which successors are worth keeping.
/// - `H: Heuristic<St, C>` estimates what's left to the goal.
///
/// Goals are tested when a node is popped, not when it's generated, so the
/// first goal found with a priority frontier is the cheapest one.
pub struct Search<P, H, F, X, Sp, St, A, C, O = LogObserver>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    F: Frontier<C>,
    X: ExploredSet<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
    O: SearchObserver<St, C>,
{
    problem: P,
    heuristic: H,

    /// Every node ever generated. Frontier entries and parents refer to
    /// nodes by their `NodeIndex` in here.
    tree: SearchTree<St, A, C>,
    frontier: F,
    explored: X,
    observer: O,

    status: SearchStatus,
    stats: SearchStats,
    /// The node that satisfied the goal test, once found.
    goal: Option<NodeIndex>,

    _phantom_space: PhantomData<Sp>,
}

impl<P, Sp, St, A, C> BreadthFirstSearch<P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    pub fn breadth_first(problem: P) -> Result<Self, SearchError> {
        Self::new(problem, ZeroHeuristic, FifoFrontier::new(), EnqueuedSet::new())
    }
}

impl<P, H, Sp, St, A, C> AStarSearch<P, H, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    pub fn astar(problem: P, heuristic: H) -> Result<Self, SearchError> {
        Self::new(
            problem,
            heuristic,
            PriorityFrontier::new(),
            BestCostMap::new(),
        )
    }
}

impl<P, H, F, X, Sp, St, A, C> Search<P, H, F, X, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    F: Frontier<C>,
    X: ExploredSet<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// Checks the problem and seeds the frontier with its start state.
    ///
    /// The strategies are expected to be empty.
    pub fn new(problem: P, heuristic: H, frontier: F, explored: X) -> Result<Self, SearchError> {
        problem.validate()?;
        heuristic.validate(problem.start())?;
        debug_assert!(frontier.is_empty(), "Search needs a fresh frontier");
        debug_assert!(explored.is_empty(), "Search needs a fresh explored set");

        let mut search = Self {
            problem,
            heuristic,
            tree: SearchTree::new(),
            frontier,
            explored,
            observer: LogObserver,
            status: SearchStatus::Ready,
            stats: SearchStats::default(),
            goal: None,
            _phantom_space: PhantomData,
        };

        let start = search.problem.start().clone();
        let g = C::zero();
        let h = search.heuristic.h(&start);
        let admitted = search.explored.should_expand(&start, g);
        debug_assert!(admitted, "The start state is the first one seen");
        let root = search.tree.push(SearchNode::new(start, None, g, h));
        search.frontier.push(root, search.tree[root].f());
        search.stats.frontier_high_water = search.frontier.len();

        Ok(search)
    }
}

impl<P, H, F, X, Sp, St, A, C, O> Search<P, H, F, X, Sp, St, A, C, O>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    F: Frontier<C>,
    X: ExploredSet<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
    O: SearchObserver<St, C>,
{
    /// Replaces the observer told about every expansion.
    #[must_use]
    pub fn with_observer<O2>(self, observer: O2) -> Search<P, H, F, X, Sp, St, A, C, O2>
    where
        O2: SearchObserver<St, C>,
    {
        Search {
            problem: self.problem,
            heuristic: self.heuristic,
            tree: self.tree,
            frontier: self.frontier,
            explored: self.explored,
            observer,
            status: self.status,
            stats: self.stats,
            goal: self.goal,
            _phantom_space: PhantomData,
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
    pub fn status(&self) -> SearchStatus {
        self.status
    }
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Pops one frontier entry and deals with it.
    ///
    /// Stale entries are dropped without expanding them, so some steps make
    /// no visible progress. Once the search ends, further steps are no-ops.
    pub fn step(&mut self) -> SearchStatus {
        #[cfg(feature = "coz_profile")]
        coz::scope!("SearchStep");

        match self.status {
            SearchStatus::Succeeded | SearchStatus::Exhausted => return self.status,
            SearchStatus::Ready => {
                log::debug!("Searching from {:?}", self.problem.start());
                self.status = SearchStatus::Running;
            }
            SearchStatus::Running => {}
        }

        let Some(node_index) = self.frontier.pop_best() else {
            self.status = SearchStatus::Exhausted;
            log::debug!("Search exhausted. {}", self.stats);
            return self.status;
        };
        self.stats.steps += 1;

        let node = &self.tree[node_index];
        let g = node.g();
        if self.explored.is_stale(node.state(), g) {
            // Outdone by a cheaper entry, or the state is already closed.
            self.stats.discarded_stale += 1;
            return self.status;
        }
        self.explored.finalize(node.state());
        self.stats.expanded += 1;

        let is_goal = self.problem.is_goal(node.state());
        self.observer.on_expand(
            node.state(),
            &Expansion {
                step: self.stats.steps,
                g,
                h: node.h(),
                f: node.f(),
                frontier_len: self.frontier.len(),
                is_goal,
            },
        );

        if is_goal {
            #[cfg(feature = "coz_profile")]
            coz::progress!("GoalFound");
            self.goal = Some(node_index);
            self.status = SearchStatus::Succeeded;
            log::debug!("Found goal {:?} at cost {}. {}", node.state(), g, self.stats);
            return self.status;
        }

        self.expand(node_index, g);
        self.status
    }

    /// Generates the successors of a node and pushes the ones worth keeping.
    fn expand(&mut self, node_index: NodeIndex, g: C) {
        #[cfg(feature = "coz_profile")]
        coz::scope!("NodeExpansion");

        let space = self.problem.space();
        for (s, a) in space.neighbours(self.tree[node_index].state()) {
            self.stats.generated += 1;
            let c = space.cost(self.tree[node_index].state(), &a);
            let child_g = g.saturating_add(&c);
            if !self.explored.should_expand(&s, child_g) {
                self.stats.pruned_duplicates += 1;
                continue;
            }
            let child_h = self.heuristic.h(&s);
            let child = self
                .tree
                .push(SearchNode::new(s, Some((node_index, a)), child_g, child_h));
            self.frontier.push(child, self.tree[child].f());
        }
        self.stats.frontier_high_water = self.stats.frontier_high_water.max(self.frontier.len());
    }

    /// Steps until the search ends.
    ///
    /// Calling this again after it returned gives back the same outcome.
    pub fn run(&mut self) -> SearchOutcome<St, A, C> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("SearchRun");

        while !self.status.is_terminal() {
            self.step();
        }
        match self.goal {
            Some(goal) => SearchOutcome::Found(self.tree.path(goal)),
            None => SearchOutcome::Exhausted,
        }
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "Search Stats ({}):", self.status)?;
        let s = size_of::<SearchNode<St, A, C>>();
        let l = self.tree.len();
        let c = self.tree.capacity();
        writeln!(
            out,
            "  - |Nodes|:    {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Nodes|*:   {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        writeln!(
            out,
            "  - |Open|:     {} ({} reserved)",
            self.frontier.len().separate_with_commas(),
            Size::from_bytes(self.frontier.allocated_bytes())
        )?;
        writeln!(
            out,
            "  - |Explored|: {} ({} reserved)",
            self.explored.len().separate_with_commas(),
            Size::from_bytes(self.explored.allocated_bytes())
        )?;
        writeln!(
            out,
            "  - Expanded nodes: {}",
            self.stats.expanded.separate_with_commas()
        )?;

        Ok(())
    }
}

impl<P, H, F, X, Sp, St, A, C, O> Debug for Search<P, H, F, X, Sp, St, A, C, O>
where
    P: Problem<Sp, St, A, C>,
    H: Heuristic<St, C>,
    F: Frontier<C>,
    X: ExploredSet<St, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
    O: SearchObserver<St, C>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Search")
            .field("problem", &self.problem)
            .field("status", &self.status)
            .field("tree", &self.tree)
            .field("frontier_len", &self.frontier.len())
            .field("explored_len", &self.explored.len())
            .field("stats", &self.stats)
            .finish()
    }
}
