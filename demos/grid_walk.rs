//! Stepped pathfinding on a randomly obstructed grid.
//!
//! Builds a lattice world, then drives the solver a few expansions per
//! simulated tick — the budget a host loop would grant between frames —
//! and finally walks an agent along the found path.
//!
//! Run: cargo run --bin grid-walk

use waygraph_core::DEFAULT_THRESHOLD;
use waygraph_demos::{GridWorld, Waypoint, euclidean};
use waygraph_search::Solver;

const SIZE: usize = 12;
const SPACING: f32 = 1.0;
const BLOCKED_RATIO: f32 = 0.2;
const SEED: u64 = 7;

/// Search expansions granted per simulated tick.
const STEPS_PER_TICK: usize = 3;
/// Agent movement per tick while walking the path.
const WALK_SPEED: f32 = 0.4;

fn main() {
    let world = GridWorld::generate(SIZE, SPACING, BLOCKED_RATIO, SEED);
    println!(
        "grid {SIZE}x{SIZE}, {} open cells, {} directed edges",
        world.graph().node_count(),
        world.graph().edge_count()
    );

    let Some((start, goal)) = world.endpoints() else {
        eprintln!("Error: every cell is obstructed");
        std::process::exit(1);
    };
    println!("searching {start} -> {goal}");

    let mut solver = Solver::new();
    if let Err(e) = solver.init(world.graph(), &euclidean, start, goal, DEFAULT_THRESHOLD) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let mut ticks = 0;
    let mut stepping = true;
    while stepping {
        for _ in 0..STEPS_PER_TICK {
            stepping = solver.step(world.graph(), &euclidean);
            if !stepping {
                break;
            }
        }
        ticks += 1;
        // A real host would do its other per-frame work here.
    }

    if !solver.goal_reached() {
        println!("frontier exhausted after {ticks} ticks: no path");
        return;
    }

    let cost = solver
        .goal_node()
        .and_then(|id| solver.cost_to(id))
        .unwrap();
    let path = solver.solution(world.graph()).unwrap();
    println!(
        "found a {}-waypoint path of cost {cost:.2} in {ticks} ticks",
        path.len()
    );

    let walk_ticks = walk(&path);
    println!("agent reached the goal in {walk_ticks} ticks");
}

/// Move an agent along `path` at a fixed speed per tick, advancing to the
/// next waypoint once it gets close, and report how many ticks it took.
fn walk(path: &[Waypoint]) -> u32 {
    let mut pos = path[0];
    let mut ticks = 0;
    for target in &path[1..] {
        while euclidean(&pos, target) > 0.5 {
            let (dx, dy) = (target.x - pos.x, target.y - pos.y);
            let len = (dx * dx + dy * dy).sqrt();
            pos = Waypoint::new(pos.x + dx / len * WALK_SPEED, pos.y + dy / len * WALK_SPEED);
            ticks += 1;
        }
        pos = *target;
    }
    ticks
}
