//! Generic weighted-graph container.
//!
//! This crate provides the storage half of a pathfinding pair:
//!
//! - [`Graph`] — an arena of typed nodes and directed, weighted edges,
//!   with stable insertion-order identities ([`NodeId`], [`EdgeId`])
//! - [`Metric`] — a caller-supplied distance measure over node payloads,
//!   used for nearest-node resolution ([`Graph::find_node`]) and, by the
//!   companion search crate, for heuristic estimation
//!
//! The container is deliberately ignorant of what a payload *is*: it never
//! compares payloads itself, so spatial proximity, floating-point identity
//! and exact key matching are all handled uniformly by whatever metric the
//! caller passes in.

mod graph;
mod metric;

pub use graph::{DEFAULT_THRESHOLD, Edge, EdgeId, Graph, Node, NodeId};
pub use metric::Metric;
