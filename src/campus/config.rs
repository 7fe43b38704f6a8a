use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};
use super::error::CampusError;
use super::geo::{GeoMapping, GeoPoint};
use super::map::{import_map_ron, load_map, CampusMap};
use super::pathfinding::SearchConfig;

/// Static configuration loaded once at startup. These values shape the
/// corridor graph and the search, so they stay fixed for the whole session.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
pub struct InitialConfig {
    // Graph & search
    pub room_link_radius: f32,
    pub goal_tolerance: f32,
    pub max_search_iterations: usize,
    /// How far a free coordinate (e.g. a GPS fix) may sit from a graph node
    /// and still be snapped onto it.
    pub snap_radius: f32,

    // Map data
    pub map_path: String,

    // Geo mapping
    pub geo_origin_lat: f64,
    pub geo_origin_lng: f64,
    pub units_per_degree_lat: f64,
    pub units_per_degree_lng: f64,
}

impl InitialConfig {
    /// Parse and check a RON config file.
    pub fn from_ron(contents: &str) -> Result<Self, CampusError> {
        let config: InitialConfig = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CampusError> {
        if self.max_search_iterations == 0 {
            return Err(CampusError::InvalidConfig(
                "max_search_iterations must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("room_link_radius", self.room_link_radius),
            ("goal_tolerance", self.goal_tolerance),
            ("snap_radius", self.snap_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CampusError::InvalidConfig(format!("{} must be finite and non-negative", name)));
            }
        }
        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            room_link_radius: self.room_link_radius,
            goal_tolerance: self.goal_tolerance,
            max_iterations: self.max_search_iterations,
        }
    }

    pub fn geo_mapping(&self) -> GeoMapping {
        GeoMapping {
            origin: GeoPoint::new(self.geo_origin_lat, self.geo_origin_lng),
            units_per_degree_lat: self.units_per_degree_lat,
            units_per_degree_lng: self.units_per_degree_lng,
        }
    }
}

impl Default for InitialConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            room_link_radius: search.room_link_radius,
            goal_tolerance: search.goal_tolerance,
            max_search_iterations: search.max_iterations,
            snap_radius: 5.0,
            map_path: "assets/campus_map.ron".to_string(),
            geo_origin_lat: 0.0,
            geo_origin_lng: 0.0,
            units_per_degree_lat: 111_320.0,
            units_per_degree_lng: 111_320.0,
        }
    }
}

/// Runtime configuration that can be hot-reloaded.
/// Only presentation and diagnostics live here; nothing that changes routes.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct NavigationConfig {
    pub coordinate_decimals: usize,
    pub slow_query_warn_ms: u64,
    pub log_route_steps: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            coordinate_decimals: 1,
            slow_query_warn_ms: 50,
            log_route_steps: false,
        }
    }
}

#[derive(Resource)]
pub struct NavigationConfigHandle(pub Handle<NavigationConfig>);

/// Resolve the live runtime config, or defaults while the asset is loading.
pub fn current_navigation_config(
    handle: Option<&NavigationConfigHandle>,
    assets: Option<&Assets<NavigationConfig>>,
) -> NavigationConfig {
    match (handle, assets) {
        (Some(handle), Some(assets)) => assets.get(&handle.0).cloned().unwrap_or_default(),
        _ => NavigationConfig::default(),
    }
}

pub struct CampusConfigPlugin;

impl Plugin for CampusConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<NavigationConfig>::new(&["navigation_config.ron"]))
            .add_systems(Startup, (load_initial_config, load_campus_map, setup_runtime_config).chain());
    }
}

/// Load static initial configuration synchronously at startup.
fn load_initial_config(mut commands: Commands) {
    let initial_config_path = "assets/initial_config.ron";

    match std::fs::read_to_string(initial_config_path) {
        Ok(contents) => match InitialConfig::from_ron(&contents) {
            Ok(config) => {
                info!("Loaded initial config from {}", initial_config_path);
                commands.insert_resource(config);
            }
            Err(e) => {
                error!("Failed to load initial config: {}", e);
                error!("Using default InitialConfig");
                commands.insert_resource(InitialConfig::default());
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", initial_config_path, e);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load the campus map named by the initial config. RON files are treated as
/// hand-edited sources, anything else as a compressed binary save.
fn load_campus_map(mut commands: Commands, config: Res<InitialConfig>) {
    let path = config.map_path.as_str();
    let loaded = if path.ends_with(".ron") {
        std::fs::read_to_string(path)
            .map_err(CampusError::from)
            .and_then(|contents| import_map_ron(&contents))
    } else {
        load_map(path)
    };

    match loaded {
        Ok(map) => {
            if let Err(e) = map.validate() {
                warn!("[MAP] {} loaded but failed validation: {}", path, e);
            }
            info!(
                "[MAP] Loaded {} buildings, {} rooms, {} corridors from {}",
                map.buildings.len(),
                map.rooms.len(),
                map.corridors.len(),
                path
            );
            commands.insert_resource(map);
        }
        Err(e) => {
            error!("[MAP] Failed to load {}: {}", path, e);
            error!("[MAP] Starting with an empty campus");
            commands.insert_resource(CampusMap::default());
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("navigation_config.ron");
    commands.insert_resource(NavigationConfigHandle(handle));
}
