use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{FilteredView, SpeciesFilter};
use crate::data::loader;
use crate::data::model::{DataTable, SortOrder, MEASUREMENT_ATTRIBUTES, SPECIES_COLUMN};
use crate::data::selection::{SelectionChanged, SelectionState, ViewConsumer};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Sidebar controls that do not affect filtering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    /// Picked measurement attributes, in picker order. Never empty.
    pub attributes: Vec<String>,
    /// "Input number": bins of the overlaid histogram (0 = automatic).
    pub overlay_bin_count: u32,
    /// "Bin Count" slider: bins of the stacked histogram (0 = automatic).
    pub stacked_bin_count: u32,
}

impl Controls {
    fn from_config(config: &DashboardConfig) -> Self {
        Self {
            attributes: config.default_attributes.clone(),
            overlay_bin_count: config.overlay_bin_count,
            stacked_bin_count: config.stacked_bin_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Consumers of the filtered view
// ---------------------------------------------------------------------------

/// Row order for the two table cards.
#[derive(Debug, Clone, Default)]
pub struct TableRows {
    /// Filtered rows in load order (data table).
    pub indices: Vec<usize>,
    /// Same rows in the data grid's sort order.
    pub grid_order: Vec<usize>,
    /// Column and direction the grid is sorted by.
    pub sort: Option<(String, SortOrder)>,
}

impl TableRows {
    fn resort(&mut self, table: &DataTable) -> Result<(), DashboardError> {
        self.grid_order = match &self.sort {
            Some((column, order)) => table.sorted_indices(&self.indices, column, *order)?,
            None => self.indices.clone(),
        };
        Ok(())
    }
}

impl ViewConsumer for TableRows {
    fn refresh(&mut self, view: &FilteredView<'_>) -> Result<(), DashboardError> {
        self.indices = view.indices().to_vec();
        self.resort(view.table())
    }
}

/// Per-species series the penguin charts draw from.
#[derive(Debug, Clone, Default)]
pub struct ChartSeries {
    labels: Vec<String>,
    /// `body_mass_g` per species.
    pub body_mass: Vec<(String, Vec<f64>)>,
    /// `[flipper_length_mm, bill_length_mm]` per species.
    pub flipper_vs_bill: Vec<(String, Vec<[f64; 2]>)>,
}

impl ChartSeries {
    fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            ..Default::default()
        }
    }
}

impl ViewConsumer for ChartSeries {
    fn refresh(&mut self, view: &FilteredView<'_>) -> Result<(), DashboardError> {
        self.body_mass = view.grouped_values(SPECIES_COLUMN, "body_mass_g", &self.labels)?;
        self.flipper_vs_bill = view.grouped_pairs(
            SPECIES_COLUMN,
            "flipper_length_mm",
            "bill_length_mm",
            &self.labels,
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Dependency chain: `selection` → filtered view → `table_rows`, `charts`.
/// Every mutation of `selection` goes through this type so the chain is
/// re-run exactly when a [`SelectionChanged`] event is published.
pub struct AppState {
    pub config: DashboardConfig,

    /// Penguin table; replaced only by File → Open….
    pub penguins: Arc<DataTable>,

    /// Tips example table, rendered unfiltered.
    pub tips: Arc<DataTable>,

    pub selection: SelectionState,
    filter: SpeciesFilter,

    pub table_rows: TableRows,
    pub charts: ChartSeries,

    pub controls: Controls,

    /// Species colours shared by every chart.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Wire datasets, selection and consumers together and compute the
    /// initial (all species) view.
    pub fn new(
        config: DashboardConfig,
        penguins: DataTable,
        tips: DataTable,
    ) -> Result<Self, DashboardError> {
        config.validate()?;
        penguins.validate_labels(SPECIES_COLUMN, &config.species)?;

        let labels = config.species.clone();
        let mut state = Self {
            controls: Controls::from_config(&config),
            penguins: Arc::new(penguins),
            tips: Arc::new(tips),
            selection: SelectionState::all(labels.clone()),
            filter: SpeciesFilter::new(SPECIES_COLUMN),
            table_rows: TableRows::default(),
            charts: ChartSeries::new(labels.clone()),
            color_map: ColorMap::new(&labels),
            status_message: None,
            config,
        };
        state.refilter()?;
        Ok(state)
    }

    /// Number of penguin rows passing the current selection.
    pub fn visible_count(&self) -> usize {
        self.table_rows.indices.len()
    }

    /// Recompute the filtered view and push it to every consumer.
    fn refilter(&mut self) -> Result<(), DashboardError> {
        let view = self
            .filter
            .apply(&self.penguins, self.selection.selected())?;
        if view.is_empty() {
            log::debug!("No penguin rows match {:?}", self.selection.selected());
        } else {
            log::trace!("{} of {} penguin rows visible", view.len(), self.penguins.len());
        }
        self.table_rows.refresh(&view)?;
        self.charts.refresh(&view)?;
        Ok(())
    }

    fn on_selection_changed(&mut self, event: Option<SelectionChanged>) {
        let Some(event) = event else {
            return;
        };
        if let Err(e) = self.refilter() {
            log::error!("Refiltering failed: {e}");
            self.status_message = Some(format!("Error: {e}"));
            return;
        }
        log::debug!(
            "Selection revision {}: {:?}",
            event.revision,
            self.selection.selected()
        );
    }

    /// Flip one species checkbox.
    pub fn toggle_species(&mut self, label: &str) {
        match self.selection.toggle(label) {
            Ok(event) => self.on_selection_changed(event),
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    pub fn select_all_species(&mut self) {
        let event = self.selection.select_all();
        self.on_selection_changed(event);
    }

    pub fn select_no_species(&mut self) {
        let event = self.selection.select_none();
        self.on_selection_changed(event);
    }

    /// Add or remove an attribute from the picker. The last picked
    /// attribute cannot be removed.
    pub fn toggle_attribute(&mut self, attribute: &str) {
        if !MEASUREMENT_ATTRIBUTES.contains(&attribute) {
            return;
        }
        if let Some(pos) = self.controls.attributes.iter().position(|a| a == attribute) {
            if self.controls.attributes.len() > 1 {
                self.controls.attributes.remove(pos);
            }
        } else {
            self.controls.attributes.push(attribute.to_string());
            // keep picker order stable regardless of click order
            self.controls.attributes.sort_by_key(|a| {
                MEASUREMENT_ATTRIBUTES
                    .iter()
                    .position(|m| m == a)
                    .unwrap_or(usize::MAX)
            });
        }
    }

    /// Sort the data grid by `column`; clicking the same column again flips
    /// the direction.
    pub fn sort_grid_by(&mut self, column: &str) {
        let order = match &self.table_rows.sort {
            Some((current, order)) if current == column => order.reversed(),
            _ => SortOrder::Ascending,
        };
        self.table_rows.sort = Some((column.to_string(), order));
        if let Err(e) = self.table_rows.resort(&self.penguins) {
            self.status_message = Some(format!("Error: {e}"));
            self.table_rows.sort = None;
        }
    }

    /// Swap in a new penguin table. The selection is kept; the filter cache
    /// is dropped and every consumer is rebuilt.
    pub fn set_penguins(&mut self, table: DataTable) -> Result<(), DashboardError> {
        table.validate_labels(SPECIES_COLUMN, self.selection.declared())?;
        table.require_columns(&MEASUREMENT_ATTRIBUTES)?;
        let previous = std::mem::replace(&mut self.penguins, Arc::new(table));
        self.filter.invalidate();
        if let Err(e) = self.refilter() {
            self.penguins = previous;
            self.filter.invalidate();
            self.refilter()?;
            return Err(e);
        }
        if let Some((column, _)) = &self.table_rows.sort {
            if self.penguins.column_index(column).is_err() {
                self.table_rows.sort = None;
                self.table_rows.grid_order = self.table_rows.indices.clone();
            }
        }
        log::debug!(
            "Rebuilt views for '{}' at selection revision {}",
            self.penguins.name,
            self.selection.revision()
        );
        self.status_message = None;
        Ok(())
    }

    /// Load a penguin table from disk; failures keep the current table and
    /// show up in the status bar.
    pub fn load_penguins_from(&mut self, path: &Path) {
        let result = loader::load_file(path)
            .and_then(|t| loader::validate_penguins(t, self.selection.declared()))
            .and_then(|t| self.set_penguins(t).map_err(anyhow::Error::from));
        match result {
            Ok(()) => log::info!("Switched penguin table to {}", path.display()),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn row(species: &str, bill: f64, flipper: i64, mass: Option<i64>) -> Vec<Value> {
        vec![
            Value::String(species.into()),
            Value::Float(bill),
            Value::Float(18.0),
            Value::Integer(flipper),
            mass.map(Value::Integer).unwrap_or(Value::Null),
        ]
    }

    fn columns() -> Vec<String> {
        [
            "species",
            "bill_length_mm",
            "bill_depth_mm",
            "flipper_length_mm",
            "body_mass_g",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn penguins() -> DataTable {
        DataTable::new(
            "penguins",
            columns(),
            vec![
                row("Adelie", 39.1, 181, Some(3750)),
                row("Gentoo", 46.1, 211, Some(5000)),
                row("Chinstrap", 46.5, 192, Some(3500)),
                row("Adelie", 36.7, 193, None),
            ],
        )
    }

    fn tips() -> DataTable {
        DataTable::new(
            "tips",
            vec!["total_bill".into(), "tip".into()],
            vec![vec![Value::Float(16.99), Value::Float(1.01)]],
        )
    }

    fn state() -> AppState {
        AppState::new(DashboardConfig::default(), penguins(), tips()).unwrap()
    }

    #[test]
    fn starts_with_every_row_visible() {
        let state = state();
        assert_eq!(state.table_rows.indices, vec![0, 1, 2, 3]);
        assert_eq!(state.charts.body_mass[0], ("Adelie".to_string(), vec![3750.0]));
        assert_eq!(state.charts.flipper_vs_bill[0].1.len(), 2);
    }

    #[test]
    fn deselecting_a_species_updates_every_consumer() {
        let mut state = state();
        state.toggle_species("Adelie");
        assert_eq!(state.table_rows.indices, vec![1, 2]);
        assert_eq!(state.table_rows.grid_order, vec![1, 2]);
        assert!(state.charts.body_mass[0].1.is_empty());
        assert_eq!(state.charts.body_mass[1].1, vec![5000.0]);
        assert_eq!(state.selection.revision(), 1);
    }

    #[test]
    fn empty_selection_renders_nothing_without_error() {
        let mut state = state();
        state.select_no_species();
        assert_eq!(state.visible_count(), 0);
        assert!(state.charts.flipper_vs_bill.iter().all(|(_, p)| p.is_empty()));
        assert!(state.status_message.is_none());

        state.select_all_species();
        assert_eq!(state.visible_count(), 4);
    }

    #[test]
    fn unknown_species_is_reported_not_applied() {
        let mut state = state();
        state.toggle_species("Emperor");
        assert!(state.status_message.as_deref().unwrap().contains("Emperor"));
        assert_eq!(state.visible_count(), 4);
        assert_eq!(state.selection.revision(), 0);
    }

    #[test]
    fn toggling_twice_restores_the_view() {
        let mut state = state();
        state.toggle_species("Gentoo");
        assert_eq!(state.table_rows.indices, vec![0, 2, 3]);
        state.toggle_species("Gentoo");
        assert_eq!(state.table_rows.indices, vec![0, 1, 2, 3]);
        assert_eq!(state.charts.body_mass[1].1, vec![5000.0]);
        assert_eq!(state.selection.revision(), 2);
    }

    #[test]
    fn grid_sort_flips_on_second_click_and_survives_refilter() {
        let mut state = state();
        state.sort_grid_by("body_mass_g");
        // NA sorts first
        assert_eq!(state.table_rows.grid_order, vec![3, 2, 0, 1]);
        state.sort_grid_by("body_mass_g");
        assert_eq!(state.table_rows.grid_order, vec![1, 0, 2, 3]);

        state.toggle_species("Gentoo");
        assert_eq!(state.table_rows.grid_order, vec![0, 2, 3]);
        assert_eq!(state.table_rows.indices, vec![0, 2, 3]);
    }

    #[test]
    fn last_attribute_cannot_be_removed() {
        let mut state = state();
        state.toggle_attribute("bill_length_mm");
        assert_eq!(state.controls.attributes, vec!["bill_length_mm"]);

        state.toggle_attribute("body_mass_g");
        state.toggle_attribute("bill_depth_mm");
        assert_eq!(
            state.controls.attributes,
            vec!["bill_length_mm", "bill_depth_mm", "body_mass_g"]
        );
        state.toggle_attribute("wing_span_mm");
        assert_eq!(state.controls.attributes.len(), 3);
    }

    #[test]
    fn replacing_the_table_keeps_the_selection() {
        let mut state = state();
        state.toggle_species("Chinstrap");
        let smaller = DataTable::new(
            "penguins2",
            columns(),
            vec![
                row("Chinstrap", 50.0, 196, Some(3900)),
                row("Gentoo", 50.0, 230, Some(5700)),
            ],
        );
        state.set_penguins(smaller).unwrap();
        assert_eq!(state.table_rows.indices, vec![1]);
        assert_eq!(state.charts.body_mass[1].1, vec![5700.0]);
    }

    #[test]
    fn invalid_replacement_keeps_the_old_table() {
        let mut state = state();
        let bad = DataTable::new(
            "bad",
            vec!["species".into()],
            vec![vec![Value::String("Adelie".into())]],
        );
        assert!(state.set_penguins(bad).is_err());
        assert_eq!(state.penguins.name, "penguins");
        assert_eq!(state.visible_count(), 4);
    }

    #[test]
    fn startup_rejects_undeclared_species() {
        let table = DataTable::new(
            "penguins",
            columns(),
            vec![row("Emperor", 45.0, 220, Some(30000))],
        );
        let err = AppState::new(DashboardConfig::default(), table, tips()).err().unwrap();
        assert!(matches!(err, DashboardError::UndeclaredLabel { .. }));
    }
}
