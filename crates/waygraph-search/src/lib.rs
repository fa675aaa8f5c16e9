//! Interruptible, stepped shortest-path search over [`waygraph_core`] graphs.
//!
//! The [`Solver`] runs best-first search one bounded unit of work at a time:
//! each [`Solver::step`] call expands exactly one frontier node and returns
//! control to the caller, so a host loop can interleave search progress with
//! other per-tick work instead of blocking on a full search.
//!
//! ```
//! use waygraph_core::{DEFAULT_THRESHOLD, Graph};
//! use waygraph_search::Solver;
//!
//! let metric = |a: &f32, b: &f32| (a - b).abs();
//! let mut g = Graph::new();
//! let a = g.add_node(0.0);
//! let b = g.add_node(1.0);
//! g.add_edge_undirected(a, b, 1.0);
//!
//! let mut solver = Solver::new();
//! solver.init(&g, &metric, 0.0, 1.0, DEFAULT_THRESHOLD).unwrap();
//! while solver.step(&g, &metric) {}
//! assert_eq!(solver.solution(&g).unwrap(), vec![0.0, 0.0, 1.0, 1.0]);
//! ```
//!
//! The ordering of the frontier is configurable via [`Strategy`]: classic
//! A* (`g + heuristic`), or pure Dijkstra (`g` alone). Supplying a metric
//! whose heuristic estimates are zero makes A* behave exactly like
//! Dijkstra.

mod path;
mod solver;
mod step;

pub use solver::{Solver, SolverError, Strategy, VisitState};
