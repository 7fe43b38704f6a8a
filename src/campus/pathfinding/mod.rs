mod types;
mod graph;
mod search;
mod instructions;
mod systems;

#[cfg(test)]
mod tests;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use types::{
    EdgeKind, GraphEdge, NodeIndex, RouteStep, SearchConfig, SearchOutcome,
    DEFAULT_GOAL_TOLERANCE, DEFAULT_MAX_ITERATIONS, DEFAULT_ROOM_LINK_RADIUS,
};
pub use graph::{CorridorGraph, GraphNode};
pub use search::breadth_first;
pub use instructions::{
    describe_path, describe_path_with, describe_route, InstructionStyle,
    ALREADY_THERE_MESSAGE, NO_PATH_MESSAGE,
};
pub use systems::{ActiveRoute, NavigationState, RouteComputed, RouteRequest, RouteStatus};

pub(crate) use systems::process_route_requests;

use bevy::prelude::*;
use super::error::CampusError;
use super::map::{CampusMap, Corridor, Room};

/// Edge ids of a fewest-edges route from `start` to `end`.
///
/// Empty when the goal is unreachable, when the search hits its iteration
/// cap, and when `start` already matches `end`. Use [`find_route`] to tell
/// those apart.
pub fn find_path(corridors: &[Corridor], rooms: &[Room], start: Vec3, end: Vec3) -> Vec<String> {
    find_route(corridors, rooms, start, end, &SearchConfig::default()).into_edge_ids()
}

/// Build a fresh graph from the given snapshot and search it.
pub fn find_route(
    corridors: &[Corridor],
    rooms: &[Room],
    start: Vec3,
    end: Vec3,
    config: &SearchConfig,
) -> SearchOutcome {
    let graph = CorridorGraph::build(corridors, rooms, config.room_link_radius);
    breadth_first(&graph, start, end, config)
}

/// [`find_route`] over a whole map, refusing maps that break the id and
/// coordinate invariants instead of silently mis-routing.
pub fn find_route_checked(
    map: &CampusMap,
    start: Vec3,
    end: Vec3,
    config: &SearchConfig,
) -> Result<SearchOutcome, CampusError> {
    map.validate()?;
    for (what, position) in [("route start", start), ("route end", end)] {
        if !position.is_finite() {
            return Err(CampusError::NonFiniteCoordinate { what, id: format!("{:?}", position) });
        }
    }
    Ok(find_route(&map.corridors, &map.rooms, start, end, config))
}
