use bevy::prelude::*;

use wayfinder::campus::locations::LocationId;
use wayfinder::campus::pathfinding::{NavigationState, RouteRequest};
use wayfinder::campus::{CampusConfigPlugin, CampusPlugin};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::fs;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: wayfinder <from> <to>\n  \
    locations: building:<id> | room:<id> | checkpoint:<corridor>:<start|end> | geo:<lat>,<lng>";

fn setup_file_logging() -> Option<String> {
    let log_dir = PathBuf::from("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        return None;
    }

    // Keep only the newest 25 log files
    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("wayfinder_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    // stderr so route output on stdout stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wayfinder=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Some(log_path_str)
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|s| s.starts_with("wayfinder") && s.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Oldest first
        log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        if log_files.len() > keep_count {
            for file in log_files.iter().take(log_files.len() - keep_count) {
                let _ = fs::remove_file(file.path());
            }
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [from, to] = args.as_slice() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    let (start, destination) = match (from.parse::<LocationId>(), to.parse::<LocationId>()) {
        (Ok(start), Ok(destination)) => (start, destination),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if let Some(log_file) = setup_file_logging() {
        eprintln!("Logging to {}", log_file);
    }

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AssetPlugin::default())
        .add_plugins((CampusConfigPlugin, CampusPlugin));

    // Startup: initial config, campus map, runtime config handle
    app.update();

    app.world_mut().write_message(RouteRequest { start, destination });
    app.update();

    let navigation = app.world().resource::<NavigationState>();
    match &navigation.active_route {
        Some(route) => {
            for line in &route.instructions {
                println!("{}", line);
            }
        }
        None => {
            eprintln!("Route request was not processed");
            std::process::exit(1);
        }
    }
}
