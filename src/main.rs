mod app;
mod color;
mod data;
mod settings;
mod state;
mod ui;

use std::path::PathBuf;

use app::MutrackApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let open = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "mutrack – Albums",
        options,
        Box::new(move |cc| Ok(Box::new(MutrackApp::new(cc, open)))),
    )
}
