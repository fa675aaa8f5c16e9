//! Shared grid-world model for the demo binaries.
//!
//! Plays the host-application role around the waygraph core: it owns the
//! waypoint layout, decides which connections are valid *before* ever
//! calling the graph's edge methods, and leaves driving the solver to a
//! per-tick loop in the binaries. Obstacles here are a plain random
//! predicate, standing in for whatever line-of-sight or physics check a
//! real host would run.

use std::fmt;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use waygraph_core::{DEFAULT_THRESHOLD, Graph, NodeId};

/// A 2D waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
}

impl Waypoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Euclidean distance between two waypoints.
///
/// Doubles as the search heuristic: straight-line distance never
/// overestimates the cost of edges weighted by that same distance.
pub fn euclidean(a: &Waypoint, b: &Waypoint) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// A square lattice of waypoints with randomly obstructed cells.
///
/// Open cells become graph nodes; every open cell is connected to its
/// open right, upper and diagonal-upper neighbours (covering each adjacent
/// pair exactly once), weighted by Euclidean distance.
pub struct GridWorld {
    graph: Graph<Waypoint>,
    size: usize,
    spacing: f32,
    ids: Vec<Option<NodeId>>,
}

impl GridWorld {
    /// Generate a `size` × `size` lattice with `spacing` between
    /// neighbours. Roughly `blocked_ratio` of the cells are obstructed and
    /// get neither a node nor any touching edge.
    pub fn generate(size: usize, spacing: f32, blocked_ratio: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();
        let mut ids = Vec::with_capacity(size * size);

        let at = |i: usize, j: usize| Waypoint::new(i as f32 * spacing, j as f32 * spacing);

        for j in 0..size {
            for i in 0..size {
                if rng.random::<f32>() < blocked_ratio {
                    ids.push(None);
                } else {
                    ids.push(Some(graph.add_node(at(i, j))));
                }
            }
        }

        // Connect right, up and the two upper diagonals; together these
        // cover every adjacent pair exactly once.
        for j in 0..size {
            for i in 0..size {
                if ids[j * size + i].is_none() {
                    continue;
                }
                let neighbors = [
                    (i + 1, j),
                    (i, j + 1),
                    (i + 1, j + 1),
                    (i.wrapping_sub(1), j + 1),
                ];
                for (ni, nj) in neighbors {
                    if ni >= size || nj >= size || ids[nj * size + ni].is_none() {
                        continue;
                    }
                    let (a, b) = (at(i, j), at(ni, nj));
                    let w = euclidean(&a, &b);
                    graph
                        .add_edge_between_undirected(&a, &b, &euclidean, DEFAULT_THRESHOLD, w)
                        .unwrap();
                }
            }
        }

        Self {
            graph,
            size,
            spacing,
            ids,
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph<Waypoint> {
        &self.graph
    }

    /// Lattice side length in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the cell at `(i, j)` is obstructed.
    pub fn is_blocked(&self, i: usize, j: usize) -> bool {
        self.ids[j * self.size + i].is_none()
    }

    /// The waypoint at cell `(i, j)`, if the cell is open.
    pub fn waypoint(&self, i: usize, j: usize) -> Option<Waypoint> {
        self.ids[j * self.size + i]
            .map(|_| Waypoint::new(i as f32 * self.spacing, j as f32 * self.spacing))
    }

    /// The first and last open cells in scan order: a far-apart query pair
    /// for the demos. `None` if the whole grid is obstructed.
    pub fn endpoints(&self) -> Option<(Waypoint, Waypoint)> {
        let mut open = (0..self.size * self.size).filter(|&n| self.ids[n].is_some());
        let first = open.next()?;
        let last = open.next_back().unwrap_or(first);
        let wp = |n: usize| {
            Waypoint::new(
                (n % self.size) as f32 * self.spacing,
                (n / self.size) as f32 * self.spacing,
            )
        };
        Some((wp(first), wp(last)))
    }
}
