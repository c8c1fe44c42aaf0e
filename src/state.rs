use std::path::{Path, PathBuf};

use crate::data::filter::{RowFilter, SearchInputs};
use crate::data::loader;
use crate::data::model::AlbumListing;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded listing (None until a file is opened).
    pub listing: Option<AlbumListing>,

    /// Raw search text per column.
    pub search: SearchInputs,

    /// Visibility of each listing row, as of the last filter pass.
    pub filter: RowFilter,

    /// Search revision the current `filter` was computed from. `None` forces
    /// a pass on the next refresh.
    applied_revision: Option<u64>,

    /// Row whose detail line is shown under the table.
    pub selected: Option<usize>,

    /// File the listing came from.
    pub current_file: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build state from persisted settings. The restored search text is
    /// applied as soon as a listing is installed.
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            search: settings.search,
            ..Default::default()
        }
    }

    pub fn to_settings(&self) -> Settings {
        Settings {
            search: self.search.clone(),
            last_file: self.current_file.clone(),
        }
    }

    /// Ingest a newly loaded listing and filter it with the current inputs.
    pub fn set_listing(&mut self, listing: AlbumListing) {
        self.listing = Some(listing);
        self.selected = None;
        self.status_message = None;
        self.applied_revision = None;
        self.refresh();
    }

    /// Load `path` into the state; failures end up in `status_message`.
    pub fn open(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(listing) => {
                log::info!("Loaded {} albums from {}", listing.len(), path.display());
                self.current_file = Some(path.to_path_buf());
                self.set_listing(listing);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Run a filter pass if the search inputs changed since the last one.
    /// This is the only place visibility is recomputed.
    pub fn refresh(&mut self) {
        let revision = self.search.revision();
        if self.applied_revision == Some(revision) {
            return;
        }
        if let Some(listing) = &self.listing {
            self.filter.apply_filters(&listing.rows, &self.search);
            self.applied_revision = Some(revision);

            if self.selected.is_some_and(|i| !self.filter.is_visible(i)) {
                self.selected = None;
            }
        }
    }

    /// Empty every search input.
    pub fn clear_search(&mut self) {
        self.search.clear();
        self.refresh();
    }

    pub fn visible_count(&self) -> usize {
        self.filter.visible_count()
    }
}
