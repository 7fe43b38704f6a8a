use serde::{Deserialize, Serialize};

/// Reference search cap: dequeues allowed before a query is abandoned.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// A room joins a corridor endpoint closer than this (strictly), XZ plane.
pub const DEFAULT_ROOM_LINK_RADIUS: f32 = 1.0;

/// Per-axis tolerance of the goal test.
pub const DEFAULT_GOAL_TOLERANCE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Corridor,
    Room,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Corridor => "corridor",
            EdgeKind::Room => "room",
        }
    }
}

/// One traversed edge of a route, tagged with the collection its id lives in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteStep {
    pub kind: EdgeKind,
    pub id: String,
}

impl RouteStep {
    pub fn corridor(id: impl Into<String>) -> Self {
        Self { kind: EdgeKind::Corridor, id: id.into() }
    }

    pub fn room(id: impl Into<String>) -> Self {
        Self { kind: EdgeKind::Room, id: id.into() }
    }
}

/// Dense index of a graph node (one per distinct [`PositionKey`](crate::campus::math::PositionKey)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Adjacency entry: leaving a node along `id` arrives at `next`.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub kind: EdgeKind,
    pub id: String,
    pub next: NodeIndex,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub room_link_radius: f32,
    pub goal_tolerance: f32,
    /// Dequeues allowed before giving up. `0` fails every search, even one
    /// that starts on its goal, so config loading refuses it.
    pub max_iterations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            room_link_radius: DEFAULT_ROOM_LINK_RADIUS,
            goal_tolerance: DEFAULT_GOAL_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Result of a breadth-first route search.
///
/// `AlreadyThere`, `Unreachable` and `IterationLimit` all flatten to an empty
/// edge-id list at the plain [`find_path`](super::find_path) entry point.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<RouteStep>),
    AlreadyThere,
    Unreachable,
    IterationLimit { iterations: usize },
}

impl SearchOutcome {
    pub fn steps(&self) -> &[RouteStep] {
        match self {
            SearchOutcome::Found(steps) => steps,
            _ => &[],
        }
    }

    pub fn into_edge_ids(self) -> Vec<String> {
        match self {
            SearchOutcome::Found(steps) => steps.into_iter().map(|step| step.id).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}
