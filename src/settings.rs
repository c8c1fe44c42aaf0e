use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::data::filter::SearchInputs;

// ---------------------------------------------------------------------------
// Persisted settings
// ---------------------------------------------------------------------------

/// What survives a restart: the search text of every column and the file
/// that was open. Stored through eframe's storage under [`eframe::APP_KEY`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchInputs,
    pub last_file: Option<PathBuf>,
}

impl Settings {
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|s| eframe::get_value(s, eframe::APP_KEY))
            .unwrap_or_default()
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// The file to open at startup: an explicit path wins, otherwise the
    /// last opened file if it still exists.
    pub fn startup_file(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.last_file.clone().filter(|p| p.exists()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    #[test]
    fn test_startup_file_prefers_explicit_path() {
        let settings = Settings {
            last_file: Some(PathBuf::from("/nonexistent/old.csv")),
            ..Default::default()
        };
        assert_eq!(
            settings.startup_file(Some(PathBuf::from("new.csv"))),
            Some(PathBuf::from("new.csv"))
        );
    }

    #[test]
    fn test_startup_file_skips_missing_last_file() {
        let settings = Settings {
            last_file: Some(PathBuf::from("/nonexistent/old.csv")),
            ..Default::default()
        };
        assert_eq!(settings.startup_file(None), None);
    }

    #[test]
    fn test_settings_tolerate_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"last_file": "albums.csv"}"#).unwrap();
        assert_eq!(settings.last_file, Some(PathBuf::from("albums.csv")));
        assert!(settings.search.is_empty());
        assert_eq!(settings.search.get(Column::Artist), "");
    }
}
