use bevy::prelude::*;
use super::error::CampusError;
use super::map::{Building, CampusMap, Corridor, Room};
use super::pathfinding::NavigationState;

/// A single edit to the campus map.
#[derive(Message, Debug, Clone)]
pub enum EditorAction {
    AddBuilding(Building),
    RemoveBuilding(String),
    AddRoom(Room),
    RemoveRoom(String),
    AddCorridor(Corridor),
    RemoveCorridor(String),
    MoveCorridor { id: String, start: Vec3, end: Vec3 },
}

/// Result of an [`EditorAction`], for the UI to report.
#[derive(Message, Debug, Clone)]
pub struct EditorOutcome {
    pub action: EditorAction,
    pub result: Result<(), String>,
    /// Whether the edit cleared the active route.
    pub route_cleared: bool,
}

impl CampusMap {
    pub fn add_building(&mut self, building: Building) -> Result<(), CampusError> {
        if self.building(&building.id).is_some() {
            return Err(CampusError::DuplicateId { id: building.id, first: "building", second: "building" });
        }
        self.buildings.push(building);
        Ok(())
    }

    /// Remove a building together with its rooms. Returns the removed room ids.
    pub fn remove_building(&mut self, id: &str) -> Result<Vec<String>, CampusError> {
        let index = self
            .buildings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| CampusError::UnknownId { what: "building", id: id.to_string() })?;
        self.buildings.remove(index);

        let removed: Vec<String> = self.rooms_in_building(id).map(|r| r.id.clone()).collect();
        self.rooms.retain(|r| r.building_id != id);
        Ok(removed)
    }

    /// Corridor and room ids share one namespace.
    pub fn add_room(&mut self, room: Room) -> Result<(), CampusError> {
        self.check_edge_id_free(&room.id, "room")?;
        if !room.position.is_finite() {
            return Err(CampusError::NonFiniteCoordinate { what: "room", id: room.id });
        }
        self.rooms.push(room);
        Ok(())
    }

    pub fn remove_room(&mut self, id: &str) -> Result<Room, CampusError> {
        let index = self
            .rooms
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CampusError::UnknownId { what: "room", id: id.to_string() })?;
        Ok(self.rooms.remove(index))
    }

    pub fn add_corridor(&mut self, corridor: Corridor) -> Result<(), CampusError> {
        self.check_edge_id_free(&corridor.id, "corridor")?;
        if !corridor.start.is_finite() || !corridor.end.is_finite() {
            return Err(CampusError::NonFiniteCoordinate { what: "corridor", id: corridor.id });
        }
        self.corridors.push(corridor);
        Ok(())
    }

    pub fn remove_corridor(&mut self, id: &str) -> Result<Corridor, CampusError> {
        let index = self
            .corridors
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CampusError::UnknownId { what: "corridor", id: id.to_string() })?;
        Ok(self.corridors.remove(index))
    }

    /// Replace both endpoints of a corridor (drag in the editor).
    pub fn move_corridor(&mut self, id: &str, start: Vec3, end: Vec3) -> Result<(), CampusError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(CampusError::NonFiniteCoordinate { what: "corridor", id: id.to_string() });
        }
        let corridor = self
            .corridors
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CampusError::UnknownId { what: "corridor", id: id.to_string() })?;
        corridor.start = start;
        corridor.end = end;
        Ok(())
    }

    fn check_edge_id_free(&self, id: &str, what: &'static str) -> Result<(), CampusError> {
        let existing = if self.corridor(id).is_some() {
            Some("corridor")
        } else if self.room(id).is_some() {
            Some("room")
        } else {
            None
        };
        match existing {
            Some(first) => Err(CampusError::DuplicateId { id: id.to_string(), first, second: what }),
            None => Ok(()),
        }
    }
}

/// Apply queued edits and clear the active route when an edit removes or
/// moves something it walks through, starts at or ends at.
pub(crate) fn apply_editor_actions(
    mut actions: MessageReader<EditorAction>,
    mut outcomes: MessageWriter<EditorOutcome>,
    mut map: ResMut<CampusMap>,
    mut navigation: ResMut<NavigationState>,
) {
    for action in actions.read() {
        let mut route_cleared = false;
        let result = match action {
            EditorAction::AddBuilding(building) => map.add_building(building.clone()),
            EditorAction::RemoveBuilding(id) => map.remove_building(id).map(|removed_rooms| {
                route_cleared = navigation.invalidate_if_references_building(id);
                for room_id in &removed_rooms {
                    route_cleared |= navigation.invalidate_if_references(room_id);
                }
            }),
            EditorAction::AddRoom(room) => map.add_room(room.clone()),
            EditorAction::RemoveRoom(id) => map.remove_room(id).map(|_| {
                route_cleared = navigation.invalidate_if_references(id);
            }),
            EditorAction::AddCorridor(corridor) => map.add_corridor(corridor.clone()),
            EditorAction::RemoveCorridor(id) => map.remove_corridor(id).map(|_| {
                route_cleared = navigation.invalidate_if_references(id);
            }),
            EditorAction::MoveCorridor { id, start, end } => map.move_corridor(id, *start, *end).map(|_| {
                route_cleared = navigation.invalidate_if_references(id);
            }),
        };

        match &result {
            Ok(()) => info!("[EDITOR] Applied {:?}", action),
            Err(e) => warn!("[EDITOR] Rejected {:?}: {}", action, e),
        }

        outcomes.write(EditorOutcome {
            action: action.clone(),
            result: result.map_err(|e| e.to_string()),
            route_cleared,
        });
    }
}
