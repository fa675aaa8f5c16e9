use waygraph_core::{Graph, NodeId};

use crate::solver::Solver;

impl<T> Solver<T> {
    /// The ids of the nodes on the found path, in start → goal order.
    ///
    /// Walks the predecessor chain back from the goal over the metadata
    /// array. Returns `None` unless the goal has been reached.
    pub fn solution_ids(&self) -> Option<Vec<NodeId>> {
        let query = self.query.as_ref()?;
        if !query.reached {
            return None;
        }

        let mut ids = Vec::new();
        let mut cur = Some(query.goal);
        while let Some(id) = cur {
            ids.push(id);
            cur = self.meta[id.index()].prev;
        }
        ids.reverse();
        Some(ids)
    }

    /// The found path as payload values, in start → goal order.
    ///
    /// The caller's original `start` and `goal` query values bracket the
    /// path: they are not necessarily identical to the resolved endpoint
    /// nodes' payloads, and both appear alongside them. Returns `None`
    /// unless the goal has been reached.
    pub fn solution(&self, graph: &Graph<T>) -> Option<Vec<T>>
    where
        T: Clone,
    {
        let query = self.query.as_ref()?;
        let ids = self.solution_ids()?;

        let mut out = Vec::with_capacity(ids.len() + 2);
        out.push(query.start_query.clone());
        for id in ids {
            out.push(graph.node(id)?.data().clone());
        }
        out.push(query.goal_query.clone());
        Some(out)
    }
}
