use bevy::prelude::*;

pub mod config;
pub mod editor;
pub mod error;
pub mod geo;
pub mod locations;
pub mod map;
pub mod math;
pub mod pathfinding;

use editor::{EditorAction, EditorOutcome};
use map::CampusMap;
use pathfinding::{NavigationState, RouteComputed, RouteRequest};

pub use config::{CampusConfigPlugin, InitialConfig, NavigationConfig};
pub use error::CampusError;

/// Registers the campus navigation state, messages and systems.
///
/// Configuration is a separate plugin ([`CampusConfigPlugin`]) because it needs
/// the asset server; without it every setting falls back to its default.
pub struct CampusPlugin;

impl Plugin for CampusPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InitialConfig>()
            .init_resource::<CampusMap>()
            .init_resource::<NavigationState>()
            .add_message::<RouteRequest>()
            .add_message::<RouteComputed>()
            .add_message::<EditorAction>()
            .add_message::<EditorOutcome>()
            .add_systems(
                Update,
                (
                    editor::apply_editor_actions,
                    pathfinding::process_route_requests,
                )
                    .chain(),
            );
        info!("[CAMPUS] Navigation plugin registered");
    }
}
