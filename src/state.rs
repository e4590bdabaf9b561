use std::collections::BTreeSet;

use crate::data::filter::{self, FilterPredicate};
use crate::data::loader;
use crate::data::model::{GroupColumn, SalaryTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None when startup loading failed).
    pub table: Option<&'static SalaryTable>,

    /// Column used for the mean-salary bar chart.
    pub group_column: GroupColumn,

    /// Dataset-wide salary bounds, fixed after load.
    pub salary_bounds: (i64, i64),

    /// User-selected salary range (inclusive on both ends).
    pub salary_range: (i64, i64),

    /// Membership selections for the advanced filter.
    pub selected_levels: BTreeSet<String>,
    pub selected_sizes: BTreeSet<String>,

    /// How many of the most frequent job titles the trend chart follows.
    pub trend_top_n: usize,

    /// Whether the raw-data preview is shown.
    pub show_preview: bool,

    /// Rows matching the salary range (None while the range is invalid).
    pub range_count: Option<usize>,
    /// Range-filter error text (inverted bounds).
    pub range_error: Option<String>,

    /// Result of the advanced membership filters.
    pub advanced: Option<SalaryTable>,
    pub filter_error: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut state = Self {
            table: None,
            group_column: GroupColumn::ExperienceLevel,
            salary_bounds: (0, 0),
            salary_range: (0, 0),
            selected_levels: BTreeSet::new(),
            selected_sizes: BTreeSet::new(),
            trend_top_n: 10,
            show_preview: false,
            range_count: None,
            range_error: None,
            advanced: None,
            filter_error: None,
            status_message: None,
        };

        match loader::load() {
            Ok(table) => {
                log::info!("dashboard ready with {} records", table.len());
                state.set_table(table);
            }
            Err(e) => {
                log::error!("failed to load salary data: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
        state
    }
}

impl AppState {
    /// Ingest the loaded table, initialise the filter widgets.
    ///
    /// Membership widgets start with every value selected, so the default
    /// view shows the whole dataset.
    pub fn set_table(&mut self, table: &'static SalaryTable) {
        self.salary_bounds = table.salary_bounds().unwrap_or((0, 0));
        self.salary_range = self.salary_bounds;
        self.selected_levels = table.unique("experience_level");
        self.selected_sizes = table.unique("company_size");

        self.table = Some(table);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the derived filter results after a widget change.
    pub fn refresh(&mut self) {
        let Some(table) = self.table else {
            return;
        };

        match filter::by_range(
            table,
            "salary_in_usd",
            self.salary_range.0 as f64,
            self.salary_range.1 as f64,
        ) {
            Ok(subset) => {
                self.range_count = Some(subset.len());
                self.range_error = None;
            }
            Err(e) => {
                self.range_count = None;
                self.range_error = Some(e.to_string());
            }
        }

        let predicates = [
            FilterPredicate::Membership {
                column: "experience_level".to_string(),
                allowed: self.selected_levels.clone(),
            },
            FilterPredicate::Membership {
                column: "company_size".to_string(),
                allowed: self.selected_sizes.clone(),
            },
        ];
        match filter::by_conjunction(table, &predicates) {
            Ok(subset) => {
                self.advanced = Some(subset);
                self.filter_error = None;
            }
            Err(e) => {
                self.advanced = None;
                self.filter_error = Some(e.to_string());
            }
        }
    }

    fn selection_mut(&mut self, column: &str) -> Option<&mut BTreeSet<String>> {
        match column {
            "experience_level" => Some(&mut self.selected_levels),
            "company_size" => Some(&mut self.selected_sizes),
            _ => None,
        }
    }

    /// Toggle a single value in a membership filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &str) {
        if let Some(selected) = self.selection_mut(column) {
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
            self.refresh();
        }
    }

    /// Select all values in a membership filter column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(table) = self.table {
            let all = table.unique(column);
            if let Some(selected) = self.selection_mut(column) {
                *selected = all;
                self.refresh();
            }
        }
    }

    /// Deselect all values in a membership filter column.
    pub fn select_none(&mut self, column: &str) {
        if let Some(selected) = self.selection_mut(column) {
            selected.clear();
            self.refresh();
        }
    }
}
