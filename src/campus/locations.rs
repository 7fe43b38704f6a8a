use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use super::error::CampusError;
use super::geo::{GeoMapping, GeoPoint};
use super::map::CampusMap;
use super::pathfinding::CorridorGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorridorEnd {
    Start,
    End,
}

/// Anything a user can pick as a route start or destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LocationId {
    Building(String),
    Room(String),
    /// A corridor endpoint, used as a named waypoint.
    Checkpoint { corridor: String, end: CorridorEnd },
    /// A free coordinate, e.g. the visitor's own GPS fix.
    Coordinates(GeoPoint),
}

impl FromStr for LocationId {
    type Err = CampusError;

    /// `building:<id>`, `room:<id>`, `checkpoint:<corridor>:<start|end>` or `geo:<lat>,<lng>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CampusError::InvalidLocation(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(invalid)?;
        if rest.is_empty() {
            return Err(invalid());
        }
        match kind {
            "building" => Ok(LocationId::Building(rest.to_string())),
            "room" => Ok(LocationId::Room(rest.to_string())),
            "checkpoint" => {
                let (corridor, end) = rest.rsplit_once(':').ok_or_else(invalid)?;
                let end = match end {
                    "start" => CorridorEnd::Start,
                    "end" => CorridorEnd::End,
                    _ => return Err(invalid()),
                };
                Ok(LocationId::Checkpoint { corridor: corridor.to_string(), end })
            }
            "geo" => {
                let (lat, lng) = rest.split_once(',').ok_or_else(invalid)?;
                let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
                let lng = lng.trim().parse::<f64>().map_err(|_| invalid())?;
                Ok(LocationId::Coordinates(GeoPoint::new(lat, lng)))
            }
            _ => Err(invalid()),
        }
    }
}

impl LocationId {
    /// Whether this location is the room, or an end of the corridor, with
    /// this id. Corridor and room ids share one namespace.
    pub fn uses_edge(&self, id: &str) -> bool {
        match self {
            LocationId::Room(room) => room == id,
            LocationId::Checkpoint { corridor, .. } => corridor == id,
            LocationId::Building(_) | LocationId::Coordinates(_) => false,
        }
    }

    pub fn is_building(&self, id: &str) -> bool {
        matches!(self, LocationId::Building(building) if building == id)
    }
}

/// Entry shown in a location selector.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationEntry {
    pub label: String,
    pub id: LocationId,
}

/// Resolve a location to the world position a search starts or ends at.
///
/// Named locations resolve to their stored coordinates untouched, so they hit
/// graph keys exactly. Free coordinates go through `geo` and are then snapped
/// to the nearest graph node within `snap_radius`; with no node in range the
/// raw position is returned and the search reports it unreachable.
pub fn resolve_location(
    map: &CampusMap,
    location: &LocationId,
    geo: &GeoMapping,
    graph: &CorridorGraph,
    snap_radius: f32,
) -> Option<Vec3> {
    match location {
        LocationId::Building(id) => map.building(id).map(|b| b.position),
        LocationId::Room(id) => map.room(id).map(|r| r.position),
        LocationId::Checkpoint { corridor, end } => map.corridor(corridor).map(|c| match end {
            CorridorEnd::Start => c.start,
            CorridorEnd::End => c.end,
        }),
        LocationId::Coordinates(point) => {
            let raw = geo.to_world(*point);
            match graph.nearest_node(raw, snap_radius) {
                Some((node, distance)) => {
                    debug!("[ROUTING] Snapped {:?} onto graph node {:?} ({:.2} away)", point, node, distance);
                    Some(graph.node(node).position)
                }
                None => {
                    warn!("[ROUTING] No graph node within {} of {:?}", snap_radius, point);
                    Some(raw)
                }
            }
        }
    }
}

/// Everything selectable, buildings first, then rooms (labelled with their
/// building), then both ends of every corridor.
pub fn list_locations(map: &CampusMap) -> Vec<LocationEntry> {
    let mut entries = Vec::with_capacity(map.buildings.len() + map.rooms.len() + map.corridors.len() * 2);

    for building in &map.buildings {
        entries.push(LocationEntry {
            label: building.name.clone(),
            id: LocationId::Building(building.id.clone()),
        });
    }

    for room in &map.rooms {
        let label = match map.building(&room.building_id) {
            Some(building) => format!("{} ({})", room.name, building.name),
            None => room.name.clone(),
        };
        entries.push(LocationEntry { label, id: LocationId::Room(room.id.clone()) });
    }

    for corridor in &map.corridors {
        for (end, suffix) in [(CorridorEnd::Start, "start"), (CorridorEnd::End, "end")] {
            entries.push(LocationEntry {
                label: format!("Checkpoint {} {}", corridor.id, suffix),
                id: LocationId::Checkpoint { corridor: corridor.id.clone(), end },
            });
        }
    }

    entries
}
