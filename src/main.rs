#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod error;
mod io;
mod model;
mod ui;

use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assignment_tracker=info".into()),
        )
        .init();

    let settings_path = config::Settings::default_path();
    let settings = config::Settings::load(&settings_path);
    if !settings_path.exists() {
        if let Err(e) = settings.save(&settings_path) {
            tracing::warn!(error = %e, "could not write default settings");
        }
    }
    tracing::info!(data_file = %settings.data_file.display(), "starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Assignment Tracker"),
        ..Default::default()
    };

    eframe::run_native(
        "Assignment Tracker",
        options,
        Box::new(|cc| Ok(Box::new(app::TrackerApp::new(cc, settings)))),
    )
}
