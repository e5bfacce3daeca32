use std::path::Path;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::data::aggregate::{Dashboard, recompute};
use crate::data::filter::{Dimension, FilterSelection};
use crate::data::loader::load_file;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Current sidebar selection.
    pub selection: FilterSelection,

    /// Figures and grouped tables for the current selection (cached).
    pub dashboard: Dashboard,

    /// Colours per product category, fixed for the whole dataset so a
    /// category keeps its colour while filters change.
    pub category_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset, select everything and aggregate.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        if dataset.is_empty() {
            log::warn!("Loaded dataset has no rows");
        }
        self.selection = FilterSelection::all(&dataset);

        let mut categories: Vec<&String> = dataset
            .records()
            .iter()
            .map(|r| &r.product_category)
            .collect();
        categories.sort();
        categories.dedup();
        self.category_colors = Some(ColorMap::new(categories.into_iter()));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Load a file and make it the active dataset. On failure the previous
    /// dataset stays in place and the error is shown in the top bar.
    pub fn open_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute the dashboard after a selection change.
    pub fn refresh(&mut self) {
        self.dashboard = match &self.dataset {
            Some(ds) => recompute(ds, &self.selection),
            None => Dashboard::default(),
        };
    }

    /// Toggle a single value of a categorical filter.
    pub fn toggle_value(&mut self, dim: Dimension, value: &str) {
        let selected = self.selection.values_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refresh();
    }

    /// Select all values of a categorical filter.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            *self.selection.values_mut(dim) = dim.universe(ds).clone();
            self.refresh();
        }
    }

    /// Deselect all values of a categorical filter.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.values_mut(dim).clear();
        self.refresh();
    }

    /// Replace the inclusive date range. An inverted range is kept as-is and
    /// simply matches nothing.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        if (start, end) != (self.selection.start, self.selection.end) {
            self.selection.start = start;
            self.selection.end = end;
            self.refresh();
        }
    }

    /// Reset the date range to the dataset's full span.
    pub fn reset_date_range(&mut self) {
        if let Some((start, end)) = self.dataset.as_ref().and_then(Dataset::date_bounds) {
            self.set_date_range(start, end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::*;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(mixed());
        state
    }

    #[test]
    fn new_dataset_selects_everything() {
        let state = loaded();
        assert_eq!(state.dashboard.visible_rows, 6);
        assert_eq!(state.selection.start, date("2024-03-01"));
        assert_eq!(state.selection.end, date("2024-03-04"));
        assert_eq!(state.selection.countries.len(), 3);
        assert!(state.category_colors.is_some());
    }

    #[test]
    fn toggling_a_country_recomputes() {
        let mut state = loaded();
        state.toggle_value(Dimension::Country, "US");
        assert_eq!(state.dashboard.visible_rows, 3);
        assert!(!state.dashboard.groups.stores_by_country.contains_key("US"));

        state.toggle_value(Dimension::Country, "US");
        assert_eq!(state.dashboard.visible_rows, 6);
    }

    #[test]
    fn select_none_then_all() {
        let mut state = loaded();
        state.select_none(Dimension::StoreType);
        assert_eq!(state.dashboard, Dashboard::default());

        state.select_all(Dimension::StoreType);
        assert_eq!(state.dashboard.visible_rows, 6);
    }

    #[test]
    fn date_range_narrows_and_resets() {
        let mut state = loaded();
        state.set_date_range(date("2024-03-02"), date("2024-03-02"));
        assert_eq!(state.dashboard.visible_rows, 2);
        assert_eq!(state.dashboard.kpis.distinct_store_count, 1);

        state.set_date_range(date("2024-03-03"), date("2024-03-02"));
        assert_eq!(state.dashboard.visible_rows, 0);
        assert_eq!(state.dashboard.kpis.avg_order_value_mean, None);

        state.reset_date_range();
        assert_eq!(state.dashboard.visible_rows, 6);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded();
        state.open_path(Path::new("/definitely/not/here.csv"));
        assert!(state.status_message.is_some());
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(6));
    }

    #[test]
    fn header_only_file_is_refused() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(
            &path,
            "date,country,store_type,store_id,product_category,total_sales,avg_order_value,loyalty_member_count\n",
        )
        .unwrap();

        let mut state = AppState::default();
        state.open_path(&path);
        assert!(state.dataset.is_none());
        assert!(state.status_message.as_deref().is_some_and(|m| m.contains("no data rows")));
        assert_eq!(state.dashboard, Dashboard::default());

        let mut state = loaded();
        state.open_path(&path);
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(6));
        assert_eq!(state.selection.start, date("2024-03-01"));
        assert_eq!(state.selection.end, date("2024-03-04"));
    }

    #[test]
    fn empty_state_has_empty_dashboard() {
        let mut state = AppState::default();
        state.refresh();
        assert_eq!(state.dashboard, Dashboard::default());
    }
}
