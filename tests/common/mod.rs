#![allow(dead_code)]

use bevy::prelude::*;
use wayfinder::campus::editor::{EditorAction, EditorOutcome};
use wayfinder::campus::map::{import_map_ron, CampusMap};
use wayfinder::campus::pathfinding::RouteComputed;
use wayfinder::campus::CampusPlugin;

/// The sample campus shipped in `assets/`.
pub fn sample_campus() -> CampusMap {
    import_map_ron(include_str!("../../assets/campus_map.ron")).expect("sample campus should parse")
}

/// Messages observed by the test app, in arrival order.
#[derive(Resource, Default)]
pub struct Observed {
    pub routes: Vec<RouteComputed>,
    pub edits: Vec<EditorOutcome>,
}

fn observe(
    mut routes: MessageReader<RouteComputed>,
    mut edits: MessageReader<EditorOutcome>,
    mut observed: ResMut<Observed>,
) {
    observed.routes.extend(routes.read().cloned());
    observed.edits.extend(edits.read().cloned());
}

/// Headless app with the campus plugin and the given map, Startup already run.
pub fn campus_app(map: CampusMap) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(CampusPlugin);
    app.init_resource::<Observed>();
    app.add_systems(PostUpdate, observe);
    app.insert_resource(map);
    app.update();
    app
}

pub fn send<M: Message>(app: &mut App, message: M) {
    app.world_mut().write_message(message);
    app.update();
}

pub fn edit(app: &mut App, action: EditorAction) {
    send(app, action);
}
