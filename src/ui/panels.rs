use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::data::model::GroupColumn;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let table = match state.table {
        Some(t) => t,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Grouping column for the mean-salary chart ----
            ui.strong("Group mean salary by");
            egui::ComboBox::from_id_salt("group_by")
                .selected_text(state.group_column.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for col in GroupColumn::ALL {
                        if ui
                            .selectable_label(state.group_column == col, col.name())
                            .clicked()
                        {
                            state.group_column = col;
                            changed = true;
                        }
                    }
                });
            ui.separator();

            // ---- Salary range ----
            ui.strong("Salary range (USD)");
            let (lo_bound, hi_bound) = state.salary_bounds;
            changed |= ui
                .add(
                    egui::Slider::new(&mut state.salary_range.0, lo_bound..=hi_bound)
                        .text("min"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut state.salary_range.1, lo_bound..=hi_bound)
                        .text("max"),
                )
                .changed();
            ui.separator();

            // ---- Membership filter widgets (collapsible) ----
            for (column, title) in [
                ("experience_level", "Experience level"),
                ("company_size", "Company size"),
            ] {
                let all_values = table.unique(column);
                let n_selected = match column {
                    "experience_level" => state.selected_levels.len(),
                    _ => state.selected_sizes.len(),
                };
                let header_text = format!("{title}  ({n_selected}/{})", all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(column);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(column);
                            }
                        });

                        let cm = ColorMap::new(&all_values);
                        for val in &all_values {
                            let is_selected = match column {
                                "experience_level" => state.selected_levels.contains(val),
                                _ => state.selected_sizes.contains(val),
                            };
                            let text = RichText::new(val.as_str()).color(cm.color_for(val));
                            let mut checked = is_selected;
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(column, val);
                            }
                        }
                    });
            }
            ui.separator();

            // ---- Trend chart depth ----
            ui.strong("Trend chart");
            changed |= ui
                .add(egui::Slider::new(&mut state.trend_top_n, 3..=15).text("top roles"))
                .changed();
        });

    // Recompute the derived results after slider / combo changes.
    if changed {
        state.refresh();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar: title, row counts, raw-data toggle, status message.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Salary Lens");

        ui.separator();

        if let Some(table) = state.table {
            let matching = state.advanced.as_ref().map(|t| t.len()).unwrap_or(0);
            ui.label(format!(
                "{} records loaded, {} matching filters",
                table.len(),
                matching
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_preview, "Raw data")
            .clicked()
        {
            state.show_preview = !state.show_preview;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
