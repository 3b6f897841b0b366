//! Admin tables: live search filtering and CSV export.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::debounce::Debouncer;
use crate::feedback::FeedbackSurface;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_EXPORT_NAME: &str = "export.csv";

/// A rendered table: the first row is the header, the rest is the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    pub visible: bool,
}

impl Row {
    fn text(&self) -> String {
        self.cells.join(" ").to_lowercase()
    }
}

impl Table {
    pub fn new<H, S>(header: H) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<R, S>(&mut self, cells: R)
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(Row {
            cells: cells.into_iter().map(Into::into).collect(),
            visible: true,
        });
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.visible)
    }

    /// Hide body rows whose text does not contain `term` (case-insensitive).
    /// Returns how many rows stay visible.
    pub fn filter(&mut self, term: &str) -> usize {
        let term = term.to_lowercase();
        for row in &mut self.rows {
            row.visible = row.text().contains(&term);
        }
        self.visible_rows().count()
    }

    /// Every cell quoted, quotes doubled, comma separated, one line per row.
    /// Hidden rows are still exported, as the browser export walks every `tr`.
    pub fn to_csv(&self) -> String {
        std::iter::once(&self.header)
            .chain(self.rows.iter().map(|r| &r.cells))
            .filter(|cells| !cells.is_empty())
            .map(|cells| {
                cells
                    .iter()
                    .map(|c| format!("\"{}\"", c.replace('"', "\"\"")))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the CSV to `path` and confirm with a banner
    pub fn export_csv(&self, path: &Path, feedback: &FeedbackSurface) -> Result<()> {
        std::fs::write(path, self.to_csv())
            .with_context(|| format!("Failed to write CSV export: {}", path.display()))?;
        tracing::info!("exported {} rows to {}", self.rows.len(), path.display());
        feedback.success("✅ Export réussi");
        Ok(())
    }
}

/// Search box bound to a table, filtering after typing settles.
pub struct TableSearch {
    table: Arc<Mutex<Table>>,
    debouncer: Debouncer<String>,
}

impl TableSearch {
    pub fn new(table: Arc<Mutex<Table>>) -> Self {
        Self::with_wait(table, SEARCH_DEBOUNCE)
    }

    pub fn with_wait(table: Arc<Mutex<Table>>, wait: Duration) -> Self {
        let target = table.clone();
        let debouncer = Debouncer::new(wait, move |term: String| {
            let visible = target.lock().filter(&term);
            tracing::debug!("search {:?}: {} rows visible", term, visible);
        });
        Self { table, debouncer }
    }

    /// One input event
    pub fn input(&self, term: impl Into<String>) {
        self.debouncer.call(term.into());
    }

    pub fn table(&self) -> Arc<Mutex<Table>> {
        self.table.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        let mut table = Table::new(["ID", "Nom", "Email"]);
        table.push_row(["1", "Alice Martin", "alice@ecole.fr"]);
        table.push_row(["2", "Bob \"le prof\" Durand", "bob@ecole.fr"]);
        table.push_row(["3", "Chloé Petit", "chloe@lycee.fr"]);
        table
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let mut table = users();
        assert_eq!(table.filter("ECOLE"), 2);
        assert!(!table.rows()[2].visible);

        assert_eq!(table.filter(""), 3);
        assert_eq!(table.filter("zzz"), 0);
    }

    #[test]
    fn test_csv_quotes_every_cell() {
        let csv = users().to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], r#""ID","Nom","Email""#);
        assert_eq!(lines[2], r#""2","Bob ""le prof"" Durand","bob@ecole.fr""#);
        assert_eq!(lines.len(), 4);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_export_writes_file_and_confirms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_NAME);
        let feedback = FeedbackSurface::default();

        users().export_csv(&path, &feedback).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("\"ID\""));
        assert_eq!(feedback.active()[0].message, "✅ Export réussi");
    }

    #[test]
    fn test_export_to_missing_directory_fails_without_banner() {
        let feedback = FeedbackSurface::default();
        let result = users().export_csv(Path::new("/nonexistent/dir/export.csv"), &feedback);
        assert!(result.is_err());
        assert!(feedback.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_applies_after_debounce() {
        let table = Arc::new(Mutex::new(users()));
        let search = TableSearch::new(table.clone());

        search.input("a");
        search.input("lycee");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(table.lock().visible_rows().count(), 3);

        tokio::time::sleep(Duration::from_millis(250)).await;
        let visible: Vec<String> = table
            .lock()
            .visible_rows()
            .map(|r| r.cells[0].clone())
            .collect();
        assert_eq!(visible, vec!["3".to_string()]);
    }

    #[test]
    fn test_search_without_runtime_filters_on_each_input() {
        let table = Arc::new(Mutex::new(users()));
        let search = TableSearch::new(table.clone());

        search.input("chloé");
        assert_eq!(table.lock().visible_rows().count(), 1);
    }
}
