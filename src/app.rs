use std::path::PathBuf;

use eframe::egui;

use crate::settings::Settings;
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MutrackApp {
    pub state: AppState,
}

impl MutrackApp {
    /// Restore persisted search text and reopen the startup file, which runs
    /// the first filter pass.
    pub fn new(cc: &eframe::CreationContext<'_>, open: Option<PathBuf>) -> Self {
        let settings = Settings::load(cc.storage);
        let startup_file = settings.startup_file(open);

        let mut state = AppState::from_settings(settings);
        if let Some(path) = startup_file {
            state.open(&path);
        }
        Self { state }
    }
}

impl eframe::App for MutrackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search inputs ----
        egui::SidePanel::left("search_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::search_panel(ui, &mut self.state);
            });

        // Single recomputation point for every input change this frame.
        self.state.refresh();

        // ---- Bottom panel: selected album ----
        egui::TopBottomPanel::bottom("details").show(ctx, |ui| {
            table::selection_details(ui, &self.state);
        });

        // ---- Central panel: album table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(index) = table::album_table(ui, &self.state) {
                self.state.selected = Some(index);
            }
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.state.to_settings().save(storage);
    }
}
