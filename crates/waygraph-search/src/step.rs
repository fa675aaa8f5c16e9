use waygraph_core::{Graph, Metric};

use crate::solver::{OpenRef, Solver, Strategy, VisitState};

impl<T> Solver<T> {
    /// Advance the search by exactly one best-first expansion.
    ///
    /// Pops the frontier node with the smallest priority (ties toward the
    /// lower node id), marks it explored, and either terminates — the goal
    /// was popped — or relaxes its outgoing edges: an undiscovered target
    /// joins the frontier with its heuristic computed once via
    /// `metric.distance(&target, &goal)`, and a target still in the
    /// frontier is re-routed through the current node whenever that
    /// improves its accumulated cost. Already-explored targets are never
    /// reopened, so results are optimal only under an admissible,
    /// consistent heuristic (see crate docs).
    ///
    /// Returns `true` while the frontier is non-empty and the goal has not
    /// been popped, i.e. while another call can make progress. Once it
    /// returns `false`, check [`goal_reached`](Self::goal_reached): the
    /// frontier also drains without success when the goal is unreachable.
    /// Calling `step` before `init`, or again after it returned `false`,
    /// is a no-op returning `false`.
    ///
    /// `graph` and `metric` must be the ones the search was initialised
    /// with; the graph must not have gained nodes since.
    pub fn step<M: Metric<T>>(&mut self, graph: &Graph<T>, metric: &M) -> bool {
        let strategy = self.strategy;
        let Some(query) = self.query.as_mut() else {
            return false;
        };
        if query.done {
            return false;
        }

        // Pop the best live entry. Entries invalidated by a later
        // improvement still sit in the heap; their node is no longer in
        // state Frontier by the time they surface, so they are skipped.
        let current = loop {
            let Some(entry) = self.open.pop() else {
                query.done = true;
                return false;
            };
            if self.meta[entry.id.index()].state == VisitState::Frontier {
                break entry.id;
            }
        };

        self.meta[current.index()].state = VisitState::Explored;
        self.frontier_len -= 1;

        if current == query.goal {
            query.done = true;
            query.reached = true;
            return false;
        }

        let Some(goal) = graph.node(query.goal) else {
            // Not the graph this search was initialised with.
            query.done = true;
            return false;
        };

        let current_g = self.meta[current.index()].g;
        let current_depth = self.meta[current.index()].depth;

        for edge in graph.edges_from(current) {
            let ti = edge.to.index();
            let g = current_g + edge.weight;
            let depth = current_depth + 1;

            match self.meta[ti].state {
                VisitState::Explored => continue,
                VisitState::Undiscovered => {
                    let Some(target) = graph.node(edge.to) else {
                        continue;
                    };
                    let m = &mut self.meta[ti];
                    m.state = VisitState::Frontier;
                    // The heuristic is fixed at first discovery and never
                    // recomputed.
                    m.heur = metric.distance(target.data(), goal.data());
                    m.g = f32::INFINITY;
                    self.frontier_len += 1;
                }
                VisitState::Frontier => {}
            }

            if g < self.meta[ti].g {
                let m = &mut self.meta[ti];
                m.prev = Some(current);
                m.g = g;
                m.depth = depth;
                let f = match strategy {
                    Strategy::AStar => g + m.heur,
                    Strategy::Dijkstra => g,
                };
                self.open.push(OpenRef { f, id: edge.to });
            }
        }

        if self.frontier_len == 0 {
            query.done = true;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};
    use waygraph_core::{DEFAULT_THRESHOLD, Graph, NodeId};

    use crate::solver::{Solver, SolverError, Strategy, VisitState};

    /// Resolves exact payload matches only; its heuristic estimates are a
    /// uniform near-zero constant, so A* under it orders like Dijkstra.
    fn exact(a: &f32, b: &f32) -> f32 {
        if a == b { 0.0 } else { 1e-3 }
    }

    fn run_to_completion(solver: &mut Solver<f32>, g: &Graph<f32>) -> usize {
        let mut steps = 0;
        while solver.step(g, &exact) {
            steps += 1;
        }
        steps + 1
    }

    /// The four-node scenario: A-B(1), B-C(1), A-C(5), C-D(1).
    fn diamond() -> (Graph<f32>, [NodeId; 4]) {
        let mut g = Graph::new();
        let a = g.add_node(0.0);
        let b = g.add_node(1.0);
        let c = g.add_node(2.0);
        let d = g.add_node(3.0);
        g.add_edge_undirected(a, b, 1.0).unwrap();
        g.add_edge_undirected(b, c, 1.0).unwrap();
        g.add_edge_undirected(a, c, 5.0).unwrap();
        g.add_edge_undirected(c, d, 1.0).unwrap();
        (g, [a, b, c, d])
    }

    /// Simple O(n²) reference Dijkstra over the same graph.
    fn reference_costs(g: &Graph<f32>, start: NodeId) -> Vec<f32> {
        let ids: Vec<NodeId> = g.nodes().map(|n| n.id()).collect();
        let mut dist = vec![f32::INFINITY; ids.len()];
        let mut settled = vec![false; ids.len()];
        dist[start.index()] = 0.0;
        loop {
            let mut best: Option<usize> = None;
            for i in 0..ids.len() {
                if !settled[i]
                    && dist[i].is_finite()
                    && best.is_none_or(|b| dist[i] < dist[b])
                {
                    best = Some(i);
                }
            }
            let Some(u) = best else { break };
            settled[u] = true;
            for e in g.edges_from(ids[u]) {
                let v = e.to.index();
                if dist[u] + e.weight < dist[v] {
                    dist[v] = dist[u] + e.weight;
                }
            }
        }
        dist
    }

    #[test]
    fn shortest_path_through_diamond() {
        let (g, [a, b, c, d]) = diamond();
        let mut solver = Solver::new();
        solver.init(&g, &exact, 0.0, 3.0, DEFAULT_THRESHOLD).unwrap();

        let steps = run_to_completion(&mut solver, &g);
        assert!(solver.goal_reached());
        assert!(steps <= g.node_count());
        assert!((solver.cost_to(d).unwrap() - 3.0).abs() < 1e-4);
        assert_eq!(solver.solution_ids().unwrap(), vec![a, b, c, d]);
    }

    #[test]
    fn dijkstra_strategy_matches_astar_on_diamond() {
        let (g, [_, _, _, d]) = diamond();
        let mut solver = Solver::with_strategy(Strategy::Dijkstra);
        solver.init(&g, &exact, 0.0, 3.0, DEFAULT_THRESHOLD).unwrap();
        while solver.step(&g, &exact) {}
        assert!(solver.goal_reached());
        assert!((solver.cost_to(d).unwrap() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn costs_match_reference_on_random_graphs() {
        for seed in 0..4u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut g = Graph::new();
            let n = 24;
            let ids: Vec<NodeId> = (0..n).map(|i| g.add_node(i as f32)).collect();
            for i in 0..n {
                for j in (i + 1)..n {
                    if rng.random::<f32>() < 0.15 {
                        let w = rng.random_range(0.5..3.0);
                        g.add_edge_undirected(ids[i], ids[j], w).unwrap();
                    }
                }
            }

            let dist = reference_costs(&g, ids[0]);
            let goal = n - 1;
            let mut solver = Solver::new();
            solver
                .init(&g, &exact, 0.0, goal as f32, DEFAULT_THRESHOLD)
                .unwrap();
            while solver.step(&g, &exact) {}

            if dist[goal].is_finite() {
                assert!(solver.goal_reached(), "seed {seed}: goal unexpectedly missed");
                let cost = solver.cost_to(ids[goal]).unwrap();
                assert!(
                    (cost - dist[goal]).abs() < 1e-3,
                    "seed {seed}: {cost} vs reference {}",
                    dist[goal]
                );
            } else {
                assert!(!solver.goal_reached(), "seed {seed}: goal should be cut off");
            }
        }
    }

    #[test]
    fn euclidean_heuristic_stays_optimal_on_lattice() {
        // 4x4 lattice of unit-spaced points, cardinal edges weighted by
        // their Euclidean length; straight-line distance never
        // overestimates the remaining cost.
        let euclid =
            |a: &(f32, f32), b: &(f32, f32)| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
        let side = 4usize;
        let mut g = Graph::new();
        let mut ids = Vec::new();
        for y in 0..side {
            for x in 0..side {
                ids.push(g.add_node((x as f32, y as f32)));
            }
        }
        for y in 0..side {
            for x in 0..side {
                let i = y * side + x;
                if x + 1 < side {
                    g.add_edge_undirected(ids[i], ids[i + 1], 1.0).unwrap();
                }
                if y + 1 < side {
                    g.add_edge_undirected(ids[i], ids[i + side], 1.0).unwrap();
                }
            }
        }

        let mut solver = Solver::new();
        solver
            .init(&g, &euclid, (0.0, 0.0), (3.0, 3.0), DEFAULT_THRESHOLD)
            .unwrap();
        while solver.step(&g, &euclid) {}

        assert!(solver.goal_reached());
        let cost = solver.cost_to(ids[side * side - 1]).unwrap();
        assert!((cost - 6.0).abs() < 1e-4, "cost {cost}");
    }

    #[test]
    fn explored_nodes_are_not_reopened_under_inflated_heuristic() {
        // S(0) - A(1) - B(2) - G(3), with a shortcut S-B and an inflated
        // estimate from A that delays its expansion until after B has been
        // explored via the expensive direct edge. The cheaper route through
        // A is found too late; B keeps its worse cost.
        let inflated = |a: &f32, b: &f32| {
            if *a == 1.0 && *b == 3.0 {
                10.0
            } else {
                (a - b).abs()
            }
        };
        let mut g = Graph::new();
        let s = g.add_node(0.0);
        let a = g.add_node(1.0);
        let b = g.add_node(2.0);
        let goal = g.add_node(3.0);
        g.add_edge_undirected(s, a, 1.0).unwrap();
        g.add_edge_undirected(a, b, 1.0).unwrap();
        g.add_edge_undirected(s, b, 5.0).unwrap();
        g.add_edge_undirected(b, goal, 50.0).unwrap();

        let mut solver = Solver::new();
        solver.init(&g, &inflated, 0.0, 3.0, DEFAULT_THRESHOLD).unwrap();
        while solver.step(&g, &inflated) {}

        // B was explored at cost 5 before A could re-route it to cost 2,
        // and stays there: forward-only relaxation.
        assert!(solver.goal_reached());
        assert_eq!(solver.visit_state(b), VisitState::Explored);
        assert!((solver.cost_to(b).unwrap() - 5.0).abs() < 1e-4);
        assert!((solver.cost_to(goal).unwrap() - 55.0).abs() < 1e-4);

        // The Dijkstra ordering ignores the junk estimate and finds the
        // true optimum on the same graph.
        let mut solver = Solver::with_strategy(Strategy::Dijkstra);
        solver.init(&g, &inflated, 0.0, 3.0, DEFAULT_THRESHOLD).unwrap();
        while solver.step(&g, &inflated) {}
        assert!((solver.cost_to(goal).unwrap() - 52.0).abs() < 1e-4);
    }

    #[test]
    fn exhausts_without_reaching_disconnected_goal() {
        let mut g = Graph::new();
        let a = g.add_node(0.0);
        let b = g.add_node(1.0);
        g.add_node(2.0); // island
        g.add_edge_undirected(a, b, 1.0).unwrap();

        let mut solver = Solver::new();
        solver.init(&g, &exact, 0.0, 2.0, DEFAULT_THRESHOLD).unwrap();
        let steps = run_to_completion(&mut solver, &g);

        assert!(steps <= g.node_count());
        assert!(solver.is_done());
        assert!(!solver.goal_reached());
        assert_eq!(solver.solution_ids(), None);
    }

    #[test]
    fn start_equal_to_goal_terminates_on_first_step() {
        let (g, [a, ..]) = diamond();
        let mut solver = Solver::new();
        solver.init(&g, &exact, 0.0, 0.0, DEFAULT_THRESHOLD).unwrap();

        assert!(!solver.step(&g, &exact));
        assert!(solver.goal_reached());
        assert_eq!(solver.solution_ids().unwrap(), vec![a]);
    }

    #[test]
    fn init_reports_unresolvable_endpoints() {
        let (g, _) = diamond();
        let mut solver = Solver::new();
        assert_eq!(
            solver.init(&g, &exact, 99.0, 3.0, DEFAULT_THRESHOLD),
            Err(SolverError::StartNotFound)
        );
        assert_eq!(
            solver.init(&g, &exact, 0.0, 99.0, DEFAULT_THRESHOLD),
            Err(SolverError::GoalNotFound)
        );
        // A failed init leaves the solver disarmed.
        assert!(!solver.step(&g, &exact));
    }

    #[test]
    fn step_before_init_and_after_done_are_no_ops() {
        let (g, _) = diamond();
        let mut solver: Solver<f32> = Solver::new();
        assert!(!solver.step(&g, &exact));

        solver.init(&g, &exact, 0.0, 3.0, DEFAULT_THRESHOLD).unwrap();
        while solver.step(&g, &exact) {}
        assert!(!solver.step(&g, &exact));
        assert!(solver.goal_reached());
    }

    #[test]
    fn solver_is_reusable_after_graph_growth() {
        let (mut g, [a, _, _, d]) = diamond();
        let mut solver = Solver::new();
        solver.init(&g, &exact, 0.0, 3.0, DEFAULT_THRESHOLD).unwrap();
        while solver.step(&g, &exact) {}
        assert!(solver.goal_reached());

        // Grow the graph between searches; re-init resizes the metadata.
        let e = g.add_node(4.0);
        g.add_edge_undirected(d, e, 1.0).unwrap();
        solver.init(&g, &exact, 0.0, 4.0, DEFAULT_THRESHOLD).unwrap();
        while solver.step(&g, &exact) {}

        assert!(solver.goal_reached());
        assert!((solver.cost_to(e).unwrap() - 4.0).abs() < 1e-4);
        assert_eq!(solver.solution_ids().unwrap().len(), 5);
        assert_eq!(solver.start_node(), Some(a));
        assert_eq!(solver.goal_node(), Some(e));
    }

    #[test]
    fn frontier_len_tracks_live_nodes() {
        let (g, _) = diamond();
        let mut solver = Solver::new();
        solver.init(&g, &exact, 0.0, 3.0, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(solver.frontier_len(), 1);

        // Expanding A discovers B and C.
        assert!(solver.step(&g, &exact));
        assert_eq!(solver.frontier_len(), 2);
    }
}
