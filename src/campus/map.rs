use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use flate2::write::ZlibEncoder;
use flate2::read::ZlibDecoder;
use flate2::Compression;
use ron::ser::PrettyConfig;
use super::error::CampusError;

pub const MAP_VERSION: u32 = 1;

/// An authored straight walkable segment between two anchor points.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Corridor {
    pub id: String,
    pub start: Vec3,
    pub end: Vec3,
    #[serde(default = "default_corridor_width")]
    pub width: f32,
}

fn default_corridor_width() -> f32 {
    2.0
}

impl Corridor {
    pub fn new(id: impl Into<String>, start: Vec3, end: Vec3) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            width: default_corridor_width(),
        }
    }

    pub fn length(&self) -> f32 {
        super::math::planar_distance(self.start, self.end)
    }
}

/// A point of interest that joins the corridor graph by proximity.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_room_size")]
    pub size: Vec3,
    pub building_id: String,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_room_size() -> Vec3 {
    Vec3::new(4.0, 3.0, 4.0)
}

impl Room {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Vec3,
        building_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            size: default_room_size(),
            building_id: building_id.into(),
            image: None,
        }
    }
}

/// A campus building. Routing targets its `position` (the main entrance).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Building {
    pub id: String,
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_building_size")]
    pub size: Vec3,
}

fn default_building_size() -> Vec3 {
    Vec3::new(20.0, 10.0, 20.0)
}

impl Building {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            size: default_building_size(),
        }
    }
}

/// The authored campus: everything the corridor graph is built from.
///
/// Held as a resource and mutated only through the editor; route queries
/// rebuild their graph from the current snapshot every time.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CampusMap {
    pub version: u32,
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub corridors: Vec<Corridor>,
}

impl Default for CampusMap {
    fn default() -> Self {
        Self {
            version: MAP_VERSION,
            buildings: Vec::new(),
            rooms: Vec::new(),
            corridors: Vec::new(),
        }
    }
}

impl CampusMap {
    pub fn corridor(&self, id: &str) -> Option<&Corridor> {
        self.corridors.iter().find(|c| c.id == id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn rooms_in_building<'a>(&'a self, building_id: &'a str) -> impl Iterator<Item = &'a Room> + 'a {
        self.rooms.iter().filter(move |r| r.building_id == building_id)
    }

    /// Check the invariants the search relies on but does not enforce itself.
    ///
    /// Corridor and room ids share one namespace (a path step is resolved by id
    /// alone), building ids have their own, and every coordinate must be finite.
    pub fn validate(&self) -> Result<(), CampusError> {
        let mut seen: FxHashMap<&str, &'static str> = FxHashMap::default();
        for corridor in &self.corridors {
            claim_id(&mut seen, &corridor.id, "corridor")?;
            if !corridor.start.is_finite() || !corridor.end.is_finite() {
                return Err(CampusError::NonFiniteCoordinate { what: "corridor", id: corridor.id.clone() });
            }
        }
        for room in &self.rooms {
            claim_id(&mut seen, &room.id, "room")?;
            if !room.position.is_finite() {
                return Err(CampusError::NonFiniteCoordinate { what: "room", id: room.id.clone() });
            }
        }

        let mut building_ids: FxHashMap<&str, &'static str> = FxHashMap::default();
        for building in &self.buildings {
            claim_id(&mut building_ids, &building.id, "building")?;
            if !building.position.is_finite() {
                return Err(CampusError::NonFiniteCoordinate { what: "building", id: building.id.clone() });
            }
        }
        Ok(())
    }
}

fn claim_id<'a>(
    seen: &mut FxHashMap<&'a str, &'static str>,
    id: &'a str,
    what: &'static str,
) -> Result<(), CampusError> {
    if let Some(first) = seen.insert(id, what) {
        return Err(CampusError::DuplicateId { id: id.to_string(), first, second: what });
    }
    Ok(())
}

/// Write the map as bincode inside a zlib stream.
pub fn save_map(path: impl AsRef<Path>, map: &CampusMap) -> Result<(), CampusError> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    let mut encoder = ZlibEncoder::new(writer, Compression::default());
    bincode::serialize_into(&mut encoder, map)?;
    encoder.finish()?;
    info!(
        "[MAP] Saved {} buildings, {} rooms, {} corridors to {}",
        map.buildings.len(),
        map.rooms.len(),
        map.corridors.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub fn load_map(path: impl AsRef<Path>) -> Result<CampusMap, CampusError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut decoder = ZlibDecoder::new(reader);
    let map: CampusMap = bincode::deserialize_from(&mut decoder)?;
    check_version(&map)?;
    Ok(map)
}

/// Parse a hand-edited RON campus description.
pub fn import_map_ron(contents: &str) -> Result<CampusMap, CampusError> {
    let map: CampusMap = ron::from_str(contents)?;
    check_version(&map)?;
    Ok(map)
}

pub fn export_map_ron(map: &CampusMap) -> Result<String, CampusError> {
    Ok(ron::ser::to_string_pretty(map, PrettyConfig::default())?)
}

fn check_version(map: &CampusMap) -> Result<(), CampusError> {
    if map.version != MAP_VERSION {
        return Err(CampusError::UnsupportedVersion { found: map.version, expected: MAP_VERSION });
    }
    Ok(())
}
