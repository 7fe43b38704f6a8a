use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;
use wayfinder_macros::profile;
use crate::campus::math::{planar_approx_eq, PositionKey};
use super::graph::CorridorGraph;
use super::types::{NodeIndex, RouteStep, SearchConfig, SearchOutcome};

/// A queued search state. The path-so-far is the chain of `parent` links back
/// to the root entry, each link contributing the edge taken to get here.
struct QueueEntry {
    node: Option<NodeIndex>,
    parent: Option<usize>,
    step: Option<(NodeIndex, usize)>,
}

/// Breadth-first search from `start` to the first node within tolerance of `goal`.
///
/// # Policy
///
/// - **Start:** the node keyed exactly by `start`'s XZ. A start that is not a
///   graph node still gets its goal test, then has no neighbours.
/// - **Visited:** marked when a node is dequeued, not when it is enqueued. A
///   node may sit in the queue several times; the first dequeue wins and later
///   ones are dropped.
/// - **Goal test:** `|dx| < tol && |dz| < tol` against the dequeued position,
///   looser than the exact keys the graph is built from.
/// - **Expansion:** neighbours are queued in adjacency order, skipping
///   self-loops (same key) and visited nodes.
/// - **Cap:** more than `max_iterations` dequeues abandons the search.
///
/// The first goal match is a fewest-edges route; ties resolve by adjacency
/// insertion order and FIFO order.
#[profile(5)]
pub fn breadth_first(graph: &CorridorGraph, start: Vec3, goal: Vec3, config: &SearchConfig) -> SearchOutcome {
    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut entries: Vec<QueueEntry> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    entries.push(QueueEntry { node: graph.node_at(start), parent: None, step: None });
    queue.push_back(0);

    let mut iterations = 0usize;

    while let Some(entry_index) = queue.pop_front() {
        iterations += 1;
        if iterations > config.max_iterations {
            warn!(
                "[ROUTING] BFS exceeded max iterations ({}) from {:?} to {:?} - giving up",
                config.max_iterations, start, goal
            );
            return SearchOutcome::IterationLimit { iterations: config.max_iterations };
        }

        let Some(current) = entries[entry_index].node else {
            // Start position is not a graph node.
            if planar_approx_eq(start, goal, config.goal_tolerance) {
                return SearchOutcome::AlreadyThere;
            }
            continue;
        };

        if visited.contains(current.index()) {
            continue;
        }
        visited.insert(current.index());

        let current_node = graph.node(current);
        if planar_approx_eq(current_node.position, goal, config.goal_tolerance) {
            if entries[entry_index].parent.is_none() {
                return SearchOutcome::AlreadyThere;
            }
            return SearchOutcome::Found(reconstruct_steps(graph, &entries, entry_index));
        }

        for (edge_index, edge) in graph.neighbors(current).iter().enumerate() {
            let next_key: PositionKey = graph.node(edge.next).key;
            if next_key == current_node.key || visited.contains(edge.next.index()) {
                continue;
            }
            entries.push(QueueEntry {
                node: Some(edge.next),
                parent: Some(entry_index),
                step: Some((current, edge_index)),
            });
            queue.push_back(entries.len() - 1);
        }
    }

    debug!("[ROUTING] No route from {:?} to {:?} after {} dequeues", start, goal, iterations);
    SearchOutcome::Unreachable
}

fn reconstruct_steps(graph: &CorridorGraph, entries: &[QueueEntry], mut index: usize) -> Vec<RouteStep> {
    let mut steps = Vec::new();
    while let Some((from, edge_index)) = entries[index].step {
        let edge = &graph.neighbors(from)[edge_index];
        steps.push(RouteStep { kind: edge.kind, id: edge.id.clone() });
        match entries[index].parent {
            Some(parent) => index = parent,
            None => break,
        }
    }
    steps.reverse();
    steps
}
