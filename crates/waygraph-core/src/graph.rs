use std::fmt;

use crate::metric::Metric;

/// Default matching threshold for [`Graph::find_node`] and the
/// payload-resolving edge helpers.
pub const DEFAULT_THRESHOLD: f32 = 1e-4;

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// Stable identity of a node within one [`Graph`].
///
/// Ids are assigned in insertion order starting at 0 and are never reused,
/// which makes them valid indices into any id-indexed auxiliary array sized
/// to the graph's node count (see [`NodeId::index`]).
///
/// An id is only meaningful for the graph that issued it. Membership checks
/// are bounds checks: an id issued by a *different* graph is rejected when
/// it falls outside this graph's node range, but is indistinguishable from
/// a local id with the same index otherwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    /// The id as a dense array index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Stable identity of an edge within one [`Graph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(u32);

impl EdgeId {
    /// The id as a dense array index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Nodes and edges
// ---------------------------------------------------------------------------

/// A graph vertex: stable identity, opaque payload, outgoing adjacency.
///
/// Nodes are owned exclusively by their [`Graph`]; everything else refers to
/// them by [`NodeId`].
#[derive(Debug, Clone)]
pub struct Node<T> {
    id: NodeId,
    data: T,
    edges: Vec<EdgeId>,
}

impl<T> Node<T> {
    /// This node's identity.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The caller-supplied payload.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Ids of the outgoing edges, in insertion order.
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// A directed, weighted connection between two nodes.
///
/// An "undirected" connection is materialised as two reciprocal directed
/// edges with the same weight (see [`Graph::add_edge_undirected`]).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f32,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An arena of typed nodes and directed, weighted edges.
///
/// The graph owns all node and edge storage. The global edge list is the
/// single source of truth; per-node adjacency lists hold [`EdgeId`]s into
/// it. Nodes and edges are only ever added, never removed, so ids stay
/// dense and monotonic for the lifetime of the graph.
///
/// The container performs no validity checking of edge *semantics* (e.g.
/// obstruction tests) and no duplicate-payload detection: adding the same
/// payload twice produces two distinct nodes. Deciding whether an edge
/// should exist is the caller's job, before calling `add_edge`.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    nodes: Vec<Node<T>>,
    edges: Vec<Edge>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a node with the next id. Always succeeds.
    pub fn add_node(&mut self, data: T) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            data,
            edges: Vec::new(),
        });
        id
    }

    /// Add a single directed edge `from → to`.
    ///
    /// Returns `None` without mutating anything if either endpoint is not a
    /// member of this graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f32) -> Option<EdgeId> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        Some(self.push_edge(from, to, weight))
    }

    /// Add an undirected connection: one edge `from → to` plus the
    /// reciprocal `to → from` as an independent edge with the same weight.
    ///
    /// Returns the forward edge's id, or `None` without mutating anything
    /// if either endpoint is not a member of this graph.
    pub fn add_edge_undirected(&mut self, from: NodeId, to: NodeId, weight: f32) -> Option<EdgeId> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        let forward = self.push_edge(from, to, weight);
        self.push_edge(to, from, weight);
        Some(forward)
    }

    /// Add a directed edge between the nodes nearest to `from` and `to`
    /// under `metric`, resolving each via [`find_node`](Self::find_node).
    ///
    /// Returns `None` if either side fails to resolve within `threshold`.
    pub fn add_edge_between<M: Metric<T>>(
        &mut self,
        from: &T,
        to: &T,
        metric: &M,
        threshold: f32,
        weight: f32,
    ) -> Option<EdgeId> {
        let from = self.find_node(from, metric, threshold)?;
        let to = self.find_node(to, metric, threshold)?;
        self.add_edge(from, to, weight)
    }

    /// Undirected variant of [`add_edge_between`](Self::add_edge_between).
    pub fn add_edge_between_undirected<M: Metric<T>>(
        &mut self,
        from: &T,
        to: &T,
        metric: &M,
        threshold: f32,
        weight: f32,
    ) -> Option<EdgeId> {
        let from = self.find_node(from, metric, threshold)?;
        let to = self.find_node(to, metric, threshold)?;
        self.add_edge_undirected(from, to, weight)
    }

    fn push_edge(&mut self, from: NodeId, to: NodeId, weight: f32) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge { from, to, weight });
        self.nodes[from.index()].edges.push(id);
        id
    }

    /// Find the node whose payload is nearest to `query` under `metric`.
    ///
    /// Linear scan over all nodes, keeping the strictly smallest distance
    /// seen so far; only distances `< threshold` are accepted. Returns
    /// `None` if the graph is empty or no node is within `threshold`.
    pub fn find_node<M: Metric<T>>(&self, query: &T, metric: &M, threshold: f32) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for node in &self.nodes {
            let d = metric.distance(query, &node.data);
            if d < threshold && best.is_none_or(|(_, min)| d < min) {
                best = Some((node.id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// Whether `id` names a node of this graph.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// The node with the given id, if any.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    /// The edge with the given id, if any.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges (an undirected connection counts twice).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    /// All directed edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Outgoing edges of `id`, in insertion order. Empty for a foreign id.
    pub fn edges_from(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        let ids: &[EdgeId] = match self.node(id) {
            Some(n) => &n.edges,
            None => &[],
        };
        ids.iter().map(|e| &self.edges[e.index()])
    }
}
