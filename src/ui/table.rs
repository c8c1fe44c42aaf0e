use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::color::rating_color;
use crate::data::model::Column;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Album table (central panel)
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 20.0;

/// Render the rows that passed the last filter pass. Returns the row the
/// user clicked, if any.
pub fn album_table(ui: &mut Ui, state: &AppState) -> Option<usize> {
    let listing = match &state.listing {
        Some(listing) => listing,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open an album listing  (File → Open…)");
            });
            return None;
        }
    };

    if listing.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("This listing has no albums.");
        });
        return None;
    }

    let visible = state.filter.visible_indices();
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(
            TableColumn::initial(140.0).at_least(60.0).clip(true),
            Column::COUNT - 1,
        )
        .column(TableColumn::remainder().at_least(80.0))
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for column in Column::ALL {
                header.col(|ui| {
                    ui.strong(column.label());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                let index = visible[row.index()];
                let album = &listing.rows[index];
                row.set_selected(state.selected == Some(index));

                for column in Column::ALL {
                    row.col(|ui| {
                        let text = album.cell(column);
                        let mut label = RichText::new(text);
                        if column == Column::Rating {
                            if let Some(color) = rating_color(text) {
                                label = label.color(color);
                            }
                        }
                        ui.label(label);
                    });
                }

                if row.response().clicked() {
                    clicked = Some(index);
                }
            });
        });

    clicked
}

// ---------------------------------------------------------------------------
// Selected album detail line (bottom panel)
// ---------------------------------------------------------------------------

pub fn selection_details(ui: &mut Ui, state: &AppState) {
    let album = state
        .selected
        .and_then(|i| state.listing.as_ref()?.rows.get(i));

    ui.horizontal(|ui: &mut Ui| match album {
        Some(album) => {
            ui.strong(&album.album);
            ui.label(format!("by {}", album.artist));
            if !album.year.is_empty() {
                ui.label(format!("({})", album.year));
            }
            ui.separator();
            ui.hyperlink_to("Search on YouTube", album.youtube_search_link());
        }
        None => {
            ui.weak("Click a row to see album details.");
        }
    });
}
