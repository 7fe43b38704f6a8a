use bevy::prelude::*;
use crate::campus::map::{CampusMap, Corridor, Room};
use crate::campus::math::planar_distance;
use super::types::{EdgeKind, RouteStep};

pub const NO_PATH_MESSAGE: &str = "No path found";
pub const ALREADY_THERE_MESSAGE: &str = "You are already at your destination";

/// Formatting options for narrated steps.
#[derive(Clone, Copy, Debug)]
pub struct InstructionStyle {
    pub coordinate_decimals: usize,
}

impl Default for InstructionStyle {
    fn default() -> Self {
        Self { coordinate_decimals: 1 }
    }
}

impl InstructionStyle {
    pub fn format_position(&self, position: Vec3) -> String {
        let p = self.coordinate_decimals;
        format!("({:.p$}, {:.p$}, {:.p$})", position.x, position.y, position.z, p = p)
    }
}

/// How corridor steps pick the endpoint the walker arrives at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    /// Always `corridor.end`; only corridor ends move the walker.
    AsAuthored,
    /// The endpoint farther from the walker; rooms move the walker too.
    Walking,
}

enum Resolved<'a> {
    Corridor(&'a Corridor),
    Room(&'a Room),
    Unknown(&'a str),
}

/// Narrate a plain edge-id path. Ids are resolved against corridors first,
/// then rooms.
///
/// Corridor lines run from the previous corridor end (or `start`) to
/// `corridor.end` as authored, whichever way the corridor is walked. Use
/// [`describe_route`] for direction-aware lines.
pub fn describe_path(edge_ids: &[String], corridors: &[Corridor], rooms: &[Room], start: Vec3) -> Vec<String> {
    describe_path_with(edge_ids, corridors, rooms, start, &InstructionStyle::default())
}

pub fn describe_path_with(
    edge_ids: &[String],
    corridors: &[Corridor],
    rooms: &[Room],
    start: Vec3,
    style: &InstructionStyle,
) -> Vec<String> {
    let resolved = edge_ids.iter().map(|id| {
        if let Some(corridor) = corridors.iter().find(|c| &c.id == id) {
            Resolved::Corridor(corridor)
        } else if let Some(room) = rooms.iter().find(|r| &r.id == id) {
            Resolved::Room(room)
        } else {
            Resolved::Unknown(id.as_str())
        }
    });
    narrate(resolved, start, style, Heading::AsAuthored)
}

/// Narrate tagged route steps. Each step is looked up only in the collection
/// its kind names, so a corridor and a room sharing an id cannot be confused.
///
/// Lines follow the walker: a corridor walked backwards ends at its start,
/// and the next line departs from the last room entered.
pub fn describe_route(steps: &[RouteStep], map: &CampusMap, start: Vec3, style: &InstructionStyle) -> Vec<String> {
    let resolved = steps.iter().map(|step| match step.kind {
        EdgeKind::Corridor => map.corridor(&step.id).map_or(Resolved::Unknown(step.id.as_str()), Resolved::Corridor),
        EdgeKind::Room => map.room(&step.id).map_or(Resolved::Unknown(step.id.as_str()), Resolved::Room),
    });
    narrate(resolved, start, style, Heading::Walking)
}

fn narrate<'a>(
    steps: impl ExactSizeIterator<Item = Resolved<'a>>,
    start: Vec3,
    style: &InstructionStyle,
    heading: Heading,
) -> Vec<String> {
    if steps.len() == 0 {
        return vec![NO_PATH_MESSAGE.to_string()];
    }

    let mut lines = Vec::with_capacity(steps.len());
    let mut at = start;
    for step in steps {
        match step {
            Resolved::Corridor(corridor) => {
                // Walking the corridor backwards arrives at its start.
                let to = if heading == Heading::Walking
                    && planar_distance(at, corridor.end) < planar_distance(at, corridor.start)
                {
                    corridor.start
                } else {
                    corridor.end
                };
                lines.push(format!(
                    "Take corridor {} from {} to {}",
                    corridor.id,
                    style.format_position(at),
                    style.format_position(to)
                ));
                at = to;
            }
            Resolved::Room(room) => {
                lines.push(format!("Enter room {} at {}", room.name, style.format_position(room.position)));
                if heading == Heading::Walking {
                    at = room.position;
                }
            }
            Resolved::Unknown(id) => {
                warn!("[ROUTING] Route step `{}` matches no corridor or room", id);
                lines.push(String::new());
            }
        }
    }
    lines
}
