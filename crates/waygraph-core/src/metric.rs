/// A caller-supplied distance measure over node payloads.
///
/// Implementations must return non-negative values. The measure is
/// asymmetric by contract: `distance(a, b)` need not equal `distance(b, a)`,
/// so callers must supply a function consistent with their own usage.
///
/// The same measure serves two roles: nearest-node resolution
/// ([`Graph::find_node`](crate::Graph::find_node)) and, in the companion
/// search crate, heuristic estimation of remaining cost. A measure that
/// always returns `0.0` turns A* into plain Dijkstra.
///
/// Any closure `Fn(&T, &T) -> f32` is a `Metric`.
pub trait Metric<T> {
    /// Distance from `a` to `b`.
    fn distance(&self, a: &T, b: &T) -> f32;
}

impl<T, F> Metric<T> for F
where
    F: Fn(&T, &T) -> f32,
{
    fn distance(&self, a: &T, b: &T) -> f32 {
        self(a, b)
    }
}
