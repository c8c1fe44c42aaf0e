use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::{Column, ColumnKind};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – search inputs
// ---------------------------------------------------------------------------

/// Render one search input per column.
///
/// Edits are only reported to the search state here; the filter pass itself
/// runs once per frame from the app's update loop.
pub fn search_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Search");
    ui.separator();

    egui::Grid::new("search_inputs")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            for column in Column::ALL {
                ui.label(column.label());
                let response = ui.add(
                    egui::TextEdit::singleline(state.search.text_mut(column))
                        .hint_text(hint_for(column.kind()))
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    state.search.mark_changed();
                }
                ui.end_row();
            }
        });

    ui.add_space(6.0);
    if ui
        .add_enabled(!state.search.is_empty(), egui::Button::new("Clear all"))
        .clicked()
    {
        state.clear_search();
    }

    ui.add_space(12.0);
    egui::CollapsingHeader::new("Syntax")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label("a, b     both must match");
            ui.label("a | b    either may match");
            ui.label("!a       must not contain a");
            ui.label(">=4, <5  compare numbers or dates");
        });
}

fn hint_for(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Text => "text, !exclude",
        ColumnKind::Numeric => ">=4, <=5",
        ColumnKind::Date => ">2023-01-01",
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(listing) = &state.listing {
            ui.label(format!(
                "{} albums loaded, {} visible",
                listing.len(),
                state.visible_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open album listing")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
