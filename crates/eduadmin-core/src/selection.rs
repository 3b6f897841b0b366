use std::collections::BTreeSet;

/// Row checkboxes ticked for a bulk action.
///
/// Only mutated from checkbox events; nothing clears it implicitly.
#[derive(Debug, Clone, Default)]
pub struct BulkSelection {
    rows: BTreeSet<String>,
}

impl BulkSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// One checkbox changed
    pub fn toggle_row(&mut self, row_id: impl Into<String>, checked: bool) {
        let row_id = row_id.into();
        if checked {
            self.rows.insert(row_id);
        } else {
            self.rows.remove(&row_id);
        }
    }

    /// The header checkbox: applies its state to every listed row
    pub fn toggle_all<I, S>(&mut self, row_ids: I, checked: bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row_id in row_ids {
            self.toggle_row(row_id, checked);
        }
    }

    pub fn contains(&self, row_id: &str) -> bool {
        self.rows.contains(row_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the bulk-actions bar should be shown
    pub fn bar_visible(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
