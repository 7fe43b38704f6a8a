use bevy::prelude::*;
use crate::campus::config::{current_navigation_config, InitialConfig, NavigationConfig, NavigationConfigHandle};
use crate::campus::locations::{resolve_location, LocationId};
use crate::campus::map::CampusMap;
use super::graph::CorridorGraph;
use super::instructions::{describe_route, InstructionStyle, ALREADY_THERE_MESSAGE, NO_PATH_MESSAGE};
use super::search::breadth_first;
use super::types::{RouteStep, SearchOutcome};

/// Ask for a route between two user-selected locations.
#[derive(Message, Debug, Clone)]
pub struct RouteRequest {
    pub start: LocationId,
    pub destination: LocationId,
}

/// Emitted once per processed [`RouteRequest`], found or not.
#[derive(Message, Debug, Clone)]
pub struct RouteComputed {
    pub route: ActiveRoute,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteStatus {
    Found,
    AlreadyThere,
    NoPath,
    IterationLimit,
    UnknownLocation,
    InvalidMap(String),
}

/// The route currently shown to the user.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveRoute {
    pub start: LocationId,
    pub destination: LocationId,
    pub start_position: Option<Vec3>,
    pub end_position: Option<Vec3>,
    pub steps: Vec<RouteStep>,
    pub instructions: Vec<String>,
    pub status: RouteStatus,
}

impl ActiveRoute {
    /// Whether the route walks through, starts at or ends at the corridor or
    /// room with this id. A room sitting exactly on a corridor end never shows
    /// up as a step, so the endpoints are checked too.
    pub fn references(&self, id: &str) -> bool {
        self.start.uses_edge(id)
            || self.destination.uses_edge(id)
            || self.steps.iter().any(|step| step.id == id)
    }

    /// Whether the route starts or ends at the building with this id.
    pub fn references_building(&self, id: &str) -> bool {
        self.start.is_building(id) || self.destination.is_building(id)
    }

    /// Ids for the renderer to highlight, in walking order.
    pub fn highlighted_edge_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|step| step.id.as_str())
    }
}

/// Navigation state owned by the app (selected route, query counters).
#[derive(Resource, Default, Debug)]
pub struct NavigationState {
    pub active_route: Option<ActiveRoute>,
    pub routes_computed: u64,
}

impl NavigationState {
    pub fn clear_route(&mut self) {
        self.active_route = None;
    }

    /// Drop the active route if it walks through `id`. Returns whether it did.
    pub fn invalidate_if_references(&mut self, id: &str) -> bool {
        let stale = self.active_route.as_ref().is_some_and(|route| route.references(id));
        if stale {
            info!("[ROUTING] Active route used `{}` which changed - clearing it", id);
            self.active_route = None;
        }
        stale
    }

    /// Drop the active route if it starts or ends at building `id`.
    pub fn invalidate_if_references_building(&mut self, id: &str) -> bool {
        let stale = self.active_route.as_ref().is_some_and(|route| route.references_building(id));
        if stale {
            info!("[ROUTING] Active route used building `{}` which changed - clearing it", id);
            self.active_route = None;
        }
        stale
    }
}

pub(crate) fn process_route_requests(
    mut requests: MessageReader<RouteRequest>,
    mut computed: MessageWriter<RouteComputed>,
    mut navigation: ResMut<NavigationState>,
    map: Res<CampusMap>,
    config: Res<InitialConfig>,
    nav_handle: Option<Res<NavigationConfigHandle>>,
    nav_configs: Option<Res<Assets<NavigationConfig>>>,
) {
    if requests.is_empty() {
        return;
    }

    let runtime = current_navigation_config(nav_handle.as_deref(), nav_configs.as_deref());
    let style = InstructionStyle { coordinate_decimals: runtime.coordinate_decimals };
    let invalid_map = map.validate().err().map(|e| {
        warn!("[ROUTING] Refusing to route on an invalid map: {}", e);
        e.to_string()
    });

    // The map cannot change while this system runs, so one graph serves the
    // whole batch. It is dropped at the end: edits never see a stale graph.
    let search = config.search_config();
    let graph = CorridorGraph::build(&map.corridors, &map.rooms, search.room_link_radius);
    let geo = config.geo_mapping();

    for request in requests.read() {
        let start_time = std::time::Instant::now();
        let start_position = resolve_location(&map, &request.start, &geo, &graph, config.snap_radius);
        let end_position = resolve_location(&map, &request.destination, &geo, &graph, config.snap_radius);

        let (status, steps, instructions) = match (&invalid_map, start_position, end_position) {
            (Some(reason), _, _) => (RouteStatus::InvalidMap(reason.clone()), Vec::new(), vec![NO_PATH_MESSAGE.to_string()]),
            (None, Some(start), Some(end)) => match breadth_first(&graph, start, end, &search) {
                SearchOutcome::Found(steps) => {
                    let instructions = describe_route(&steps, &map, start, &style);
                    (RouteStatus::Found, steps, instructions)
                }
                SearchOutcome::AlreadyThere => {
                    (RouteStatus::AlreadyThere, Vec::new(), vec![ALREADY_THERE_MESSAGE.to_string()])
                }
                SearchOutcome::Unreachable => (RouteStatus::NoPath, Vec::new(), vec![NO_PATH_MESSAGE.to_string()]),
                SearchOutcome::IterationLimit { .. } => {
                    (RouteStatus::IterationLimit, Vec::new(), vec![NO_PATH_MESSAGE.to_string()])
                }
            },
            (None, _, _) => {
                warn!(
                    "[ROUTING] Unknown location in request {:?} -> {:?}",
                    request.start, request.destination
                );
                (RouteStatus::UnknownLocation, Vec::new(), vec![NO_PATH_MESSAGE.to_string()])
            }
        };

        let elapsed = start_time.elapsed();
        if elapsed.as_millis() > runtime.slow_query_warn_ms as u128 {
            warn!("[ROUTING] Slow route query: {:?} for {} nodes", elapsed, graph.node_count());
        }

        info!(
            "[ROUTING] {:?} -> {:?}: {:?} ({} steps)",
            request.start,
            request.destination,
            status,
            steps.len()
        );
        if runtime.log_route_steps {
            for line in &instructions {
                info!("[ROUTING]   {}", line);
            }
        }

        let route = ActiveRoute {
            start: request.start.clone(),
            destination: request.destination.clone(),
            start_position,
            end_position,
            steps,
            instructions,
            status,
        };
        navigation.active_route = Some(route.clone());
        navigation.routes_computed += 1;
        computed.write(RouteComputed { route });
    }
}
