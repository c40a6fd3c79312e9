//! Explicit weighted graphs with labelled vertices.

use std::fmt::Display;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Space;
use crate::space::State;

/// A vertex, interned by its label.
#[derive(Copy, Clone, Debug, derive_more::Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("v{_0}")]
pub struct Vertex(u32);
impl State for Vertex {}

impl Vertex {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Following a specific edge. Parallel edges are told apart.
#[derive(Copy, Clone, Debug, derive_more::Display, PartialEq, Eq, Hash)]
#[display("e{_0}")]
pub struct EdgeId(u32);
impl Action for EdgeId {}

impl EdgeId {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge<C>
where
    C: Cost,
{
    pub from: Vertex,
    pub to: Vertex,
    pub weight: C,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown vertex '{0}'")]
    UnknownVertex(String),
    #[error("Edge {from}->{to} has negative weight {weight}")]
    NegativeWeight {
        from: String,
        to: String,
        weight: String,
    },
    #[error("Edge {from}->{to} has an unbounded weight")]
    UnboundedWeight { from: String, to: String },
    #[error("Cannot parse edge '{0}', expected 'A-B:w' or 'A>B:w'")]
    BadEdge(String),
    #[error("Empty vertex label in '{0}'")]
    EmptyLabel(String),
    #[error("Cannot parse weight in '{entry}': {reason}")]
    BadWeight { entry: String, reason: String },
    #[error("Cannot parse heuristic entry '{0}', expected 'A:h'")]
    BadHeuristic(String),
}

/// A directed graph with non-negative edge weights.
///
/// Undirected edges are stored as a pair of directed ones. Outgoing edges
/// keep their insertion order, which is the order successors are generated.
#[derive(Clone, Debug)]
pub struct WeightedGraph<C>
where
    C: Cost,
{
    labels: Vec<String>,
    index: FxHashMap<String, Vertex>,
    edges: Vec<Edge<C>>,
    adjacency: Vec<SmallVec<[EdgeId; 4]>>,
}

impl<C> WeightedGraph<C>
where
    C: Cost,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            labels: vec![],
            index: FxHashMap::default(),
            edges: vec![],
            adjacency: vec![],
        }
    }

    /// Gets the vertex for a label, adding it if it's new.
    pub fn add_vertex(&mut self, label: &str) -> Vertex {
        if let Some(v) = self.index.get(label) {
            return *v;
        }
        let v = Vertex(self.labels.len() as u32);
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), v);
        self.adjacency.push(SmallVec::new());
        v
    }

    pub fn vertex(&self, label: &str) -> Option<Vertex> {
        self.index.get(label).copied()
    }

    /// Like [`WeightedGraph::vertex`], for labels that must exist.
    pub fn require(&self, label: &str) -> Result<Vertex, GraphError> {
        self.vertex(label)
            .ok_or_else(|| GraphError::UnknownVertex(label.to_string()))
    }

    pub fn label(&self, v: Vertex) -> &str {
        &self.labels[v.index()]
    }

    /// Adds a one-way edge.
    pub fn add_edge(&mut self, from: Vertex, to: Vertex, weight: C) -> Result<EdgeId, GraphError> {
        debug_assert!(self.valid(&from) && self.valid(&to));
        if weight < C::zero() {
            return Err(GraphError::NegativeWeight {
                from: self.label(from).to_string(),
                to: self.label(to).to_string(),
                weight: weight.to_string(),
            });
        }
        if !weight.valid() {
            return Err(GraphError::UnboundedWeight {
                from: self.label(from).to_string(),
                to: self.label(to).to_string(),
            });
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge { from, to, weight });
        self.adjacency[from.index()].push(id);
        Ok(id)
    }

    /// Adds an edge both ways.
    pub fn add_undirected_edge(
        &mut self,
        a: Vertex,
        b: Vertex,
        weight: C,
    ) -> Result<(EdgeId, EdgeId), GraphError> {
        let forward = self.add_edge(a, b, weight)?;
        let backward = self.add_edge(b, a, weight)?;
        Ok((forward, backward))
    }

    pub fn edge(&self, id: EdgeId) -> &Edge<C> {
        &self.edges[id.index()]
    }

    /// Edges leaving `v`, in insertion order.
    pub fn out_edges(&self, v: Vertex) -> impl Iterator<Item = EdgeId> + '_ {
        self.adjacency
            .get(v.index())
            .into_iter()
            .flat_map(|edges| edges.iter().copied())
    }

    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Parses a single `A-B:w`, `A>B:w` or `A` entry into the graph.
    fn add_entry(&mut self, entry: &str) -> Result<(), GraphError>
    where
        C: FromStr,
        <C as FromStr>::Err: Display,
    {
        let Some(split) = entry.find(['-', '>']) else {
            if entry.contains(':') {
                return Err(GraphError::BadEdge(entry.to_string()));
            }
            self.add_vertex(entry);
            return Ok(());
        };
        let directed = entry[split..].starts_with('>');
        let from = entry[..split].trim();
        let (to, weight) = entry[split + 1..]
            .rsplit_once(':')
            .ok_or_else(|| GraphError::BadEdge(entry.to_string()))?;
        let to = to.trim();
        if from.is_empty() || to.is_empty() {
            return Err(GraphError::EmptyLabel(entry.to_string()));
        }
        if to.contains(['-', '>']) {
            return Err(GraphError::BadEdge(entry.to_string()));
        }
        let weight = weight
            .trim()
            .parse::<C>()
            .map_err(|e| GraphError::BadWeight {
                entry: entry.to_string(),
                reason: e.to_string(),
            })?;

        let from = self.add_vertex(from);
        let to = self.add_vertex(to);
        if directed {
            self.add_edge(from, to, weight)?;
        } else {
            self.add_undirected_edge(from, to, weight)?;
        }
        Ok(())
    }
}

impl<C> Default for WeightedGraph<C>
where
    C: Cost,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Parses an edge list.
///
/// Entries are separated by commas or new lines, `#` starts a comment,
/// - `A-B:10` is an undirected edge.
/// - `A>B:10` is a one-way edge from `A` to `B`.
/// - `A` on its own declares a vertex.
///
/// Labels can't contain `-`, `>`, `:`, `,` or `#`.
///
/// ```
/// use statesearch::problems::graph::WeightedGraph;
/// let g: WeightedGraph<u32> = "A-B:10, A-C:15 # the rest\nB>D:12".parse().unwrap();
/// assert_eq!(g.vertex_count(), 4);
/// assert_eq!(g.edge_count(), 5);
/// ```
impl<C> FromStr for WeightedGraph<C>
where
    C: Cost + FromStr,
    <C as FromStr>::Err: Display,
{
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut graph = Self::new();
        for line in s.lines() {
            let line = match line.find('#') {
                Some(comment) => &line[..comment],
                None => line,
            };
            for entry in line.split(',') {
                let entry = entry.trim();
                if !entry.is_empty() {
                    graph.add_entry(entry)?;
                }
            }
        }
        Ok(graph)
    }
}

impl<C> Space<Vertex, EdgeId, C> for WeightedGraph<C>
where
    C: Cost,
{
    #[inline(always)]
    fn apply(&self, s: &Vertex, a: &EdgeId) -> Option<Vertex> {
        let edge = self.edges.get(a.index())?;
        (edge.from == *s).then_some(edge.to)
    }

    #[inline(always)]
    fn cost(&self, _s: &Vertex, a: &EdgeId) -> C {
        self.edges
            .get(a.index())
            .map_or_else(C::max_value, |edge| edge.weight)
    }

    fn neighbours(&self, s: &Vertex) -> Vec<(Vertex, EdgeId)> {
        self.out_edges(*s)
            .map(|e| (self.edges[e.index()].to, e))
            .collect()
    }

    #[inline(always)]
    fn valid(&self, s: &Vertex) -> bool {
        s.index() < self.labels.len()
    }
}

/// Per-vertex estimates. Vertices without one estimate zero.
#[derive(Clone, Debug)]
pub struct HeuristicTable<C>
where
    C: Cost,
{
    values: Vec<C>,
}

impl<C> HeuristicTable<C>
where
    C: Cost,
{
    /// All zeros.
    pub fn new(graph: &WeightedGraph<C>) -> Self {
        Self {
            values: vec![C::zero(); graph.vertex_count()],
        }
    }

    pub fn set(&mut self, v: Vertex, h: C) {
        if v.index() >= self.values.len() {
            self.values.resize(v.index() + 1, C::zero());
        }
        self.values[v.index()] = h;
    }

    /// Parses `A:7, B:6` style tables. Every label must be in `graph`.
    pub fn parse(graph: &WeightedGraph<C>, s: &str) -> Result<Self, GraphError>
    where
        C: FromStr,
        <C as FromStr>::Err: Display,
    {
        let mut table = Self::new(graph);
        for entry in s.split(|c: char| c == ',' || c.is_whitespace()) {
            if entry.is_empty() {
                continue;
            }
            let (label, value) = entry
                .split_once(':')
                .ok_or_else(|| GraphError::BadHeuristic(entry.to_string()))?;
            let v = graph.require(label.trim())?;
            let h = value
                .trim()
                .parse::<C>()
                .map_err(|e| GraphError::BadWeight {
                    entry: entry.to_string(),
                    reason: e.to_string(),
                })?;
            if h < C::zero() {
                return Err(GraphError::BadHeuristic(entry.to_string()));
            }
            table.set(v, h);
        }
        Ok(table)
    }
}

impl<C> Heuristic<Vertex, C> for HeuristicTable<C>
where
    C: Cost,
{
    #[inline(always)]
    fn h(&self, s: &Vertex) -> C {
        self.values.get(s.index()).copied().unwrap_or_else(C::zero)
    }
}

/// Travel between two vertices of a graph.
#[derive(Clone, Debug)]
pub struct GraphProblem<C>
where
    C: Cost,
{
    graph: WeightedGraph<C>,
    start: Vertex,
    goal: Vertex,
}

impl<C> GraphProblem<C>
where
    C: Cost,
{
    pub fn new(graph: WeightedGraph<C>, start: &str, goal: &str) -> Result<Self, GraphError> {
        let start = graph.require(start)?;
        let goal = graph.require(goal)?;
        Ok(Self { graph, start, goal })
    }
}

impl<C> Problem<WeightedGraph<C>, Vertex, EdgeId, C> for GraphProblem<C>
where
    C: Cost,
{
    fn space(&self) -> &WeightedGraph<C> {
        &self.graph
    }
    fn start(&self) -> &Vertex {
        &self.start
    }
    #[inline(always)]
    fn is_goal(&self, s: &Vertex) -> bool {
        *s == self.goal
    }
    fn goal(&self) -> Option<&Vertex> {
        Some(&self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_cost::FloatCost;
    use crate::search::SearchMode;
    use crate::search::solve;

    type Real = FloatCost<f64>;

    #[test]
    fn parses_edge_lists() {
        let g: WeightedGraph<u32> = indoc::indoc! {"
            # Four corners
            A-B:10, A-C:15
            B-D:12
            C>D:10  # one way
            E
        "}
        .parse()
        .unwrap();

        assert_eq!(g.vertex_count(), 5);
        assert_eq!(g.edge_count(), 7);
        let (a, d) = (g.vertex("A").unwrap(), g.vertex("D").unwrap());
        assert_eq!(g.label(d), "D");

        let targets: Vec<&str> = g.neighbours(&a).iter().map(|(v, _)| g.label(*v)).collect();
        assert_eq!(targets, vec!["B", "C"]);
        let from_d: Vec<&str> = g.neighbours(&d).iter().map(|(v, _)| g.label(*v)).collect();
        assert_eq!(from_d, vec!["B"], "C>D is one way");
        assert!(g.neighbours(&g.vertex("E").unwrap()).is_empty());
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "A-B".parse::<WeightedGraph<u32>>().unwrap_err(),
            GraphError::BadEdge("A-B".to_string())
        );
        assert_eq!(
            "A:3".parse::<WeightedGraph<u32>>().unwrap_err(),
            GraphError::BadEdge("A:3".to_string())
        );
        assert_eq!(
            "-B:3".parse::<WeightedGraph<u32>>().unwrap_err(),
            GraphError::EmptyLabel("-B:3".to_string())
        );
        assert!(matches!(
            "A-B:x".parse::<WeightedGraph<u32>>().unwrap_err(),
            GraphError::BadWeight { .. }
        ));
        assert!(matches!(
            "A-B:-1.5".parse::<WeightedGraph<Real>>().unwrap_err(),
            GraphError::BadWeight { .. }
        ));
        assert_eq!(
            "A>B:inf".parse::<WeightedGraph<Real>>().unwrap_err(),
            GraphError::UnboundedWeight {
                from: "A".to_string(),
                to: "B".to_string()
            }
        );
    }

    #[test]
    fn labels_cannot_hold_separators() {
        assert_eq!(
            "New-York-Boston:5".parse::<WeightedGraph<u32>>().unwrap_err(),
            GraphError::BadEdge("New-York-Boston:5".to_string())
        );
        assert_eq!(
            "A>B>C:1".parse::<WeightedGraph<u32>>().unwrap_err(),
            GraphError::BadEdge("A>B>C:1".to_string())
        );
        let g: WeightedGraph<u32> = "New_York-Boston:5".parse().unwrap();
        assert!(g.vertex("New_York").is_some());
        assert!(g.vertex("Boston").is_some());
    }

    #[test]
    fn edges_are_actions() {
        let g: WeightedGraph<u32> = "A-B:3, A-B:5".parse().unwrap();
        let (a, b) = (g.vertex("A").unwrap(), g.vertex("B").unwrap());
        let out: Vec<EdgeId> = g.out_edges(a).collect();
        assert_eq!(out.len(), 2);
        assert_eq!(g.apply(&a, &out[1]), Some(b));
        assert_eq!(g.apply(&b, &out[1]), None, "Edge doesn't leave B");
        assert_eq!(g.cost(&a, &out[0]), 3);
        assert_eq!(g.cost(&a, &out[1]), 5);
        assert!(g.valid(&b));
        assert!(!g.valid(&Vertex(2)));
    }

    #[test]
    fn heuristic_tables() {
        let g: WeightedGraph<u32> = "A-B:10, A-C:15, B-D:12, C-D:10".parse().unwrap();
        let h = HeuristicTable::parse(&g, "A:7,B:6 C:2").unwrap();
        assert_eq!(h.h(&g.vertex("A").unwrap()), 7);
        assert_eq!(h.h(&g.vertex("C").unwrap()), 2);
        assert_eq!(h.h(&g.vertex("D").unwrap()), 0, "Missing means zero");

        assert_eq!(
            HeuristicTable::parse(&g, "Z:1").unwrap_err(),
            GraphError::UnknownVertex("Z".to_string())
        );
        assert_eq!(
            HeuristicTable::parse(&g, "A=1").unwrap_err(),
            GraphError::BadHeuristic("A=1".to_string())
        );
    }

    #[test]
    fn problem_requires_known_labels() {
        let g: WeightedGraph<u32> = "A-B:1".parse().unwrap();
        assert_eq!(
            GraphProblem::new(g.clone(), "A", "Q").unwrap_err(),
            GraphError::UnknownVertex("Q".to_string())
        );
        let p = GraphProblem::new(g, "A", "B").unwrap();
        assert!(p.is_goal(&Vertex(1)));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn real_weights() {
        let g: WeightedGraph<Real> = "A-B:1.5, B-C:1.25, A-C:3".parse().unwrap();
        let h = HeuristicTable::parse(&g, "A:2.5,B:1").unwrap();
        let problem = GraphProblem::new(g, "A", "C").unwrap();
        let report = solve(problem.clone(), h, SearchMode::AStar).unwrap();
        let path = report.outcome.path().unwrap();
        assert_eq!(path.cost, FloatCost::new(2.75));
        assert_eq!(path.len(), 2);
        assert!(problem.space().valid_path(path));
    }
}
