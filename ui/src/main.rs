//! VoxRack demo host.
//!
//! Standalone window that drives every plugin surface from a synthetic
//! analysis engine, for development without a running audio engine.

#![warn(clippy::all, rust_2018_idioms)]

mod app;

use app::VoxRackApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting VoxRack demo host");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 560.0])
            .with_title("VoxRack - Plugin Surfaces"),
        ..Default::default()
    };

    eframe::run_native(
        "VoxRack",
        native_options,
        Box::new(|cc| Ok(Box::new(VoxRackApp::new(cc)))),
    )
}
