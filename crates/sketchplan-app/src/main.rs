//! Sketchplan replay entry point
//!
//! Replays a recorded drawing script and prints the resulting layers as JSON.
//!
//! ```text
//! sketchplan <script.ron> [--config <draw.ron>]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use sketchplan_app::{ConfigManager, DrawingController, ReplayScript};

fn usage() -> ! {
    eprintln!("usage: sketchplan <script.ron> [--config <draw.ron>]");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchplan_app=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut script_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => usage(),
            },
            "-h" | "--help" => usage(),
            _ if script_path.is_none() => script_path = Some(PathBuf::from(arg)),
            _ => usage(),
        }
    }
    let Some(script_path) = script_path else {
        usage();
    };

    tracing::info!("Replaying {:?}", script_path);

    let manager = match config_path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = Arc::new(RwLock::new(manager));

    let script = ReplayScript::load(&script_path)?;
    let mut controller = DrawingController::new(script.region(), config);
    let summary = script.run(&mut controller)?;
    tracing::info!(
        "{} graphics from {} tools ({} finishes rejected)",
        summary.graphics,
        summary.tools,
        summary.rejected
    );

    let layers: Vec<serde_json::Value> = controller
        .layers()
        .ids()
        .iter()
        .filter_map(|id| controller.layer(id))
        .map(|layer| {
            serde_json::json!({
                "id": layer.id(),
                "title": layer.title(),
                "elevation": layer.elevation(),
                "graphics": layer.graphics(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&layers)?);
    Ok(())
}
