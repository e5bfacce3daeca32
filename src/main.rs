mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::SalesLensApp;
use clap::Parser;
use eframe::egui;

/// Interactive sales performance dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Sales table to open on startup (.csv, .json or .parquet).
    file: Option<PathBuf>,

    /// Initial window width in points.
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Initial window height in points.
    #[arg(long, default_value_t = 860.0)]
    height: f32,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Lens – Sales Performance Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SalesLensApp::new(cli.file.as_deref())))),
    )
}
