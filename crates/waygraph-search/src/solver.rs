use std::collections::BinaryHeap;
use std::fmt;

use waygraph_core::{Graph, Metric, NodeId};

/// Visit state of a node during one search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisitState {
    /// Not yet reached by the expanding frontier.
    #[default]
    Undiscovered,
    /// Discovered and awaiting expansion (in the open set).
    Frontier,
    /// Expanded. Explored nodes are never revisited.
    Explored,
}

/// Frontier ordering used by the solver.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Order by `g + heuristic` (classic A*).
    #[default]
    AStar,
    /// Order by accumulated cost alone, ignoring the heuristic entirely.
    Dijkstra,
}

/// Error returned by [`Solver::init`] when a query endpoint does not
/// resolve to any node of the graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolverError {
    /// No node within the threshold of the start query.
    StartNotFound,
    /// No node within the threshold of the goal query.
    GoalNotFound,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartNotFound => write!(f, "no node within threshold of the start query"),
            Self::GoalNotFound => write!(f, "no node within threshold of the goal query"),
        }
    }
}

impl std::error::Error for SolverError {}

// ---------------------------------------------------------------------------
// Search-scoped state
// ---------------------------------------------------------------------------

/// Per-node search metadata, one slot per node id, lifetime = one search.
#[derive(Clone, Debug)]
pub(crate) struct Meta {
    pub(crate) state: VisitState,
    pub(crate) g: f32,
    pub(crate) heur: f32,
    pub(crate) depth: u32,
    pub(crate) prev: Option<NodeId>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            state: VisitState::Undiscovered,
            g: 0.0,
            heur: 0.0,
            depth: 0,
            prev: None,
        }
    }
}

/// Open-set entry, ordered so the max-`BinaryHeap` pops the smallest
/// priority first. Ties pop the lower node id.
#[derive(Copy, Clone, PartialEq)]
pub(crate) struct OpenRef {
    pub(crate) f: f32,
    pub(crate) id: NodeId,
}

impl Eq for OpenRef {}

impl Ord for OpenRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for OpenRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The armed query: resolved endpoints plus the caller's original query
/// values, which reappear at the ends of the reconstructed solution.
pub(crate) struct Query<T> {
    pub(crate) start: NodeId,
    pub(crate) goal: NodeId,
    pub(crate) start_query: T,
    pub(crate) goal_query: T,
    pub(crate) done: bool,
    pub(crate) reached: bool,
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Stepped best-first search over one [`Graph`].
///
/// A solver owns only search-scoped state (the metadata array and the open
/// set); the graph and metric are passed into [`init`](Self::init) and
/// [`step`](Self::step) by the caller and are never stored. One solver is
/// reusable across searches: re-`init` fully discards prior state and
/// re-sizes the metadata array to the graph's current node count.
///
/// The graph must not gain nodes between `init` and the final `step` of a
/// search; the metadata array is sized at `init` time.
pub struct Solver<T> {
    pub(crate) strategy: Strategy,
    pub(crate) meta: Vec<Meta>,
    pub(crate) open: BinaryHeap<OpenRef>,
    pub(crate) frontier_len: usize,
    pub(crate) query: Option<Query<T>>,
}

impl<T> Default for Solver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Solver<T> {
    /// Create a solver with the default [`Strategy::AStar`] ordering.
    pub fn new() -> Self {
        Self::with_strategy(Strategy::default())
    }

    /// Create a solver with an explicit frontier ordering.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            meta: Vec::new(),
            open: BinaryHeap::new(),
            frontier_len: 0,
            query: None,
        }
    }

    /// The frontier ordering in use.
    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Arm a new search from `start` to `goal`.
    ///
    /// Both query values are resolved to graph nodes via
    /// [`Graph::find_node`] under `metric` and `threshold`; an unresolvable
    /// endpoint is reported as an error rather than deferred to a fault
    /// during stepping. On success the previous search (if any) is fully
    /// discarded: fresh metadata is allocated for the graph's current node
    /// count and the frontier contains exactly the resolved start node with
    /// accumulated cost 0.
    pub fn init<M: Metric<T>>(
        &mut self,
        graph: &Graph<T>,
        metric: &M,
        start: T,
        goal: T,
        threshold: f32,
    ) -> Result<(), SolverError> {
        // Disarm first so a failed init leaves no stale search behind.
        self.query = None;
        self.meta.clear();
        self.open.clear();
        self.frontier_len = 0;

        let start_node = graph
            .find_node(&start, metric, threshold)
            .ok_or(SolverError::StartNotFound)?;
        let goal_node = graph
            .find_node(&goal, metric, threshold)
            .ok_or(SolverError::GoalNotFound)?;

        self.meta.resize(graph.node_count(), Meta::default());

        let s = &mut self.meta[start_node.index()];
        s.state = VisitState::Frontier;
        s.g = 0.0;
        self.open.push(OpenRef {
            f: 0.0,
            id: start_node,
        });
        self.frontier_len = 1;

        self.query = Some(Query {
            start: start_node,
            goal: goal_node,
            start_query: start,
            goal_query: goal,
            done: false,
            reached: false,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The resolved start node of the current search.
    pub fn start_node(&self) -> Option<NodeId> {
        self.query.as_ref().map(|q| q.start)
    }

    /// The resolved goal node of the current search.
    pub fn goal_node(&self) -> Option<NodeId> {
        self.query.as_ref().map(|q| q.goal)
    }

    /// Visit state of `id` in the current search.
    pub fn visit_state(&self, id: NodeId) -> VisitState {
        self.meta
            .get(id.index())
            .map_or(VisitState::Undiscovered, |m| m.state)
    }

    /// Best known accumulated cost from the start to `id`, if discovered.
    pub fn cost_to(&self, id: NodeId) -> Option<f32> {
        match self.meta.get(id.index()) {
            Some(m) if m.state != VisitState::Undiscovered => Some(m.g),
            _ => None,
        }
    }

    /// Discovery depth of `id` (edge count from the start), if discovered.
    pub fn depth(&self, id: NodeId) -> Option<u32> {
        match self.meta.get(id.index()) {
            Some(m) if m.state != VisitState::Undiscovered => Some(m.depth),
            _ => None,
        }
    }

    /// Number of nodes currently in the frontier.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier_len
    }

    /// Whether the current search has terminated (goal expanded or frontier
    /// exhausted). `false` before `init`.
    pub fn is_done(&self) -> bool {
        self.query.as_ref().is_some_and(|q| q.done)
    }

    /// Whether the goal node has been expanded.
    ///
    /// [`step`](Self::step) returning `false` means only that stepping is
    /// over; on a disconnected graph the frontier drains without ever
    /// reaching the goal. Check this before trusting the solution.
    pub fn goal_reached(&self) -> bool {
        self.query.as_ref().is_some_and(|q| q.reached)
    }
}
