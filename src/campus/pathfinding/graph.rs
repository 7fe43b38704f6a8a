use bevy::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use wayfinder_macros::profile;
use crate::campus::map::{Corridor, Room};
use crate::campus::math::{planar_distance, PositionKey};
use super::types::{EdgeKind, GraphEdge, NodeIndex};

/// One distinct position of the graph. `position` is the first coordinate
/// registered under the key; later registrations only differ in height.
#[derive(Clone, Debug)]
pub struct GraphNode {
    pub key: PositionKey,
    pub position: Vec3,
}

/// Undirected multigraph of corridors and rooms keyed by exact XZ position.
///
/// # Construction rules
///
/// 1. **Corridors:** each corridor adds `start → end` and `end → start`
///    entries, both tagged with the corridor id.
/// 2. **Rooms:** every room gets a node at its own position, even if nothing
///    ever links to it.
/// 3. **Room bridges:** a room strictly closer than `room_link_radius` to a
///    corridor endpoint is spliced in as a pass-through: the near endpoint
///    gains an edge to the room (room id) and the room gains an edge to the
///    far endpoint (corridor id).
///
/// Nothing is deduplicated, so corridors sharing an endpoint each contribute
/// their own entry. Adjacency lists keep insertion order; the search breaks
/// ties by that order, which keeps routes reproducible.
#[derive(Clone, Debug, Default)]
pub struct CorridorGraph {
    node_lookup: FxHashMap<PositionKey, NodeIndex>,
    nodes: Vec<GraphNode>,
    adjacency: Vec<SmallVec<[GraphEdge; 4]>>,
    edge_count: usize,
}

impl CorridorGraph {
    #[profile(2)]
    pub fn build(corridors: &[Corridor], rooms: &[Room], room_link_radius: f32) -> Self {
        let mut graph = CorridorGraph::default();

        for corridor in corridors {
            let start = graph.intern(corridor.start);
            let end = graph.intern(corridor.end);
            graph.push_edge(start, EdgeKind::Corridor, &corridor.id, end);
            graph.push_edge(end, EdgeKind::Corridor, &corridor.id, start);
        }

        for room in rooms {
            let room_node = graph.intern(room.position);

            for corridor in corridors {
                if planar_distance(room.position, corridor.start) < room_link_radius {
                    let start = graph.intern(corridor.start);
                    let end = graph.intern(corridor.end);
                    graph.push_edge(start, EdgeKind::Room, &room.id, room_node);
                    graph.push_edge(room_node, EdgeKind::Corridor, &corridor.id, end);
                }
                if planar_distance(room.position, corridor.end) < room_link_radius {
                    let start = graph.intern(corridor.start);
                    let end = graph.intern(corridor.end);
                    graph.push_edge(end, EdgeKind::Room, &room.id, room_node);
                    graph.push_edge(room_node, EdgeKind::Corridor, &corridor.id, start);
                }
            }
        }

        debug!(
            "[GRAPH] Built {} nodes / {} edges from {} corridors and {} rooms",
            graph.nodes.len(),
            graph.edge_count,
            corridors.len(),
            rooms.len()
        );
        graph
    }

    fn intern(&mut self, position: Vec3) -> NodeIndex {
        let key = PositionKey::of(position);
        if let Some(&index) = self.node_lookup.get(&key) {
            return index;
        }
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(GraphNode { key, position });
        self.adjacency.push(SmallVec::new());
        self.node_lookup.insert(key, index);
        index
    }

    fn push_edge(&mut self, from: NodeIndex, kind: EdgeKind, id: &str, next: NodeIndex) {
        self.adjacency[from.index()].push(GraphEdge { kind, id: id.to_string(), next });
        self.edge_count += 1;
    }

    pub fn node_at(&self, position: Vec3) -> Option<NodeIndex> {
        self.node_lookup.get(&PositionKey::of(position)).copied()
    }

    pub fn contains(&self, position: Vec3) -> bool {
        self.node_at(position).is_some()
    }

    pub fn node(&self, index: NodeIndex) -> &GraphNode {
        &self.nodes[index.index()]
    }

    pub fn neighbors(&self, index: NodeIndex) -> &[GraphEdge] {
        &self.adjacency[index.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Directed adjacency entries (each corridor counts twice).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Closest node on the XZ plane within `max_distance` (inclusive).
    ///
    /// Used to place free coordinates such as a GPS fix onto the graph before
    /// a search. Ties go to the node registered first.
    pub fn nearest_node(&self, position: Vec3, max_distance: f32) -> Option<(NodeIndex, f32)> {
        let mut best: Option<(NodeIndex, f32)> = None;
        for (i, node) in self.nodes.iter().enumerate() {
            let distance = planar_distance(node.position, position);
            if distance > max_distance {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((NodeIndex(i as u32), distance));
            }
        }
        best
    }
}
