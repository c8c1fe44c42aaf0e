use serde::{Deserialize, Serialize};

use super::model::{AlbumRow, Column};
use super::query::Expression;

// ---------------------------------------------------------------------------
// Search inputs: one raw expression per column
// ---------------------------------------------------------------------------

/// The text typed into each column's search box.
///
/// Every reported edit bumps `revision`, which is what the application
/// watches to decide when a filter pass is due. The revision is transient and
/// is not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchInputs {
    values: [String; Column::COUNT],
    #[serde(skip)]
    revision: u64,
}

impl SearchInputs {
    pub fn get(&self, column: Column) -> &str {
        &self.values[column.index()]
    }

    /// Replace a column's text. Returns whether anything changed.
    pub fn set(&mut self, column: Column, text: impl Into<String>) -> bool {
        let text = text.into();
        let slot = &mut self.values[column.index()];
        if *slot == text {
            return false;
        }
        *slot = text;
        self.mark_changed();
        true
    }

    /// Direct access for text widgets; call [`SearchInputs::mark_changed`]
    /// when the widget reports an edit.
    pub fn text_mut(&mut self, column: Column) -> &mut String {
        &mut self.values[column.index()]
    }

    pub fn mark_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Empty every input; counts as a single change.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.values.iter_mut().for_each(String::clear);
        self.mark_changed();
    }

    /// Whether every input is blank after trimming.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Row filter engine
// ---------------------------------------------------------------------------

/// Per-row `filtered_out` flags, recomputed from scratch on each pass.
///
/// Rendering reads visibility from here and nowhere else.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    filtered_out: Vec<bool>,
}

impl RowFilter {
    /// Run a full filter pass.
    ///
    /// A row stays visible only if the expression of every column holds for
    /// that row's cell. Once a column rejects a row the row stays rejected
    /// for the rest of the pass.
    pub fn apply_filters(&mut self, rows: &[AlbumRow], inputs: &SearchInputs) {
        self.filtered_out.clear();
        self.filtered_out.resize(rows.len(), false);

        for column in Column::ALL {
            let expression = Expression::parse(inputs.get(column), column.kind());
            if expression.matches_everything() {
                continue;
            }

            for (row, out) in rows.iter().zip(self.filtered_out.iter_mut()) {
                if !*out && !expression.matches(row.cell(column)) {
                    *out = true;
                }
            }
        }

        log::debug!(
            "filter pass: {} of {} rows visible",
            self.visible_count(),
            rows.len()
        );
    }

    /// Rows outside the last pass are reported hidden.
    pub fn is_visible(&self, index: usize) -> bool {
        self.filtered_out.get(index).is_some_and(|out| !*out)
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        self.filtered_out
            .iter()
            .enumerate()
            .filter(|(_, out)| !**out)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.filtered_out.iter().filter(|out| !**out).count()
    }
}
