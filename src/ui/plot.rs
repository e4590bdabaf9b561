use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Grid, RichText, ScrollArea, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints,
};

use crate::color::{diverging, ColorMap};
use crate::data::model::{SalaryRecord, SalaryTable};
use crate::data::stats;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the dashboard sections in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(table) = state.table else {
        // Loading failed at startup: show the blocking message and nothing
        // else.
        ui.centered_and_justified(|ui: &mut Ui| {
            let msg = state
                .status_message
                .clone()
                .unwrap_or_else(|| "No dataset loaded.".to_string());
            ui.heading(RichText::new(msg).color(Color32::RED));
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data science salary explorer");
            ui.label("Descriptive views over the loaded salary survey. The side panel steers the charts.");

            if state.show_preview {
                preview_section(ui, table);
            }
            describe_section(ui, table);
            france_section(ui, table);
            group_mean_section(ui, table, state);
            correlation_section(ui, table);
            trend_section(ui, table, state);
            median_section(ui, table);
            range_section(ui, state);
            remote_section(ui, table);
            advanced_section(ui, state);
            ui.add_space(16.0);
        });
}

fn section_heading(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(title);
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Raw preview & summary statistics
// ---------------------------------------------------------------------------

const COLUMNS: [&str; 9] = [
    "work_year",
    "experience_level",
    "employment_type",
    "job_title",
    "salary_in_usd",
    "employee_residence",
    "remote_ratio",
    "company_location",
    "company_size",
];

fn record_grid(ui: &mut Ui, id: &str, records: &[SalaryRecord], limit: usize) {
    Grid::new(id).striped(true).show(ui, |ui: &mut Ui| {
        for col in COLUMNS {
            ui.strong(col);
        }
        ui.end_row();

        for rec in records.iter().take(limit) {
            ui.label(rec.work_year.to_string());
            ui.label(rec.experience_level.as_str());
            ui.label(rec.employment_type.as_str());
            ui.label(rec.job_title.as_str());
            ui.label(rec.salary_in_usd.to_string());
            ui.label(rec.employee_residence.as_str());
            ui.label(format!("{}%", rec.remote_ratio));
            ui.label(rec.company_location.as_str());
            ui.label(rec.company_size.as_str());
            ui.end_row();
        }
    });
}

fn preview_section(ui: &mut Ui, table: &SalaryTable) {
    section_heading(ui, "Raw data preview");
    record_grid(ui, "preview", &table.records, 5);
}

fn describe_section(ui: &mut Ui, table: &SalaryTable) {
    section_heading(ui, "Summary statistics");

    let summaries = stats::describe(table);
    if summaries.is_empty() {
        ui.label("No rows to summarise.");
        return;
    }

    Grid::new("describe").striped(true).show(ui, |ui: &mut Ui| {
        ui.label("");
        for s in &summaries {
            ui.strong(s.column);
        }
        ui.end_row();

        let rows: [(&str, Box<dyn Fn(&stats::ColumnSummary) -> String>); 8] = [
            ("count", Box::new(|s| s.count.to_string())),
            ("mean", Box::new(|s| format!("{:.1}", s.mean))),
            ("std", Box::new(|s| format!("{:.1}", s.std))),
            ("min", Box::new(|s| format!("{:.1}", s.min))),
            ("25%", Box::new(|s| format!("{:.1}", s.q25))),
            ("50%", Box::new(|s| format!("{:.1}", s.median))),
            ("75%", Box::new(|s| format!("{:.1}", s.q75))),
            ("max", Box::new(|s| format!("{:.1}", s.max))),
        ];
        for (name, fmt) in &rows {
            ui.strong(*name);
            for s in &summaries {
                ui.label(fmt(s));
            }
            ui.end_row();
        }
    });
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

fn categorical_label(labels: &[String], mark: GridMark) -> String {
    let rounded = mark.value.round();
    if (mark.value - rounded).abs() > 0.05 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// One coloured box per group, groups laid out on integer x positions.
fn grouped_boxplot(ui: &mut Ui, id: &str, groups: &[(String, stats::FiveNumber)]) {
    let labels: Vec<String> = groups.iter().map(|(k, _)| k.clone()).collect();
    let cm = ColorMap::from_ordered(&labels);

    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(240.0)
        .x_axis_formatter({
            let labels = labels.clone();
            move |mark: GridMark, _range: &RangeInclusive<f64>| categorical_label(&labels, mark)
        })
        .show(ui, |plot_ui| {
            for (i, (key, f)) in groups.iter().enumerate() {
                let color = cm.color_for(key);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(f.min, f.q1, f.median, f.q3, f.max),
                )
                .name(key)
                .fill(color.gamma_multiply(0.4));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(key).color(color));
            }
        });
}

fn france_section(ui: &mut Ui, table: &SalaryTable) {
    section_heading(ui, "Salary distribution in France");

    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for rec in &table.records {
        if rec.company_location == "FR" {
            groups
                .entry(rec.experience_level.as_str())
                .or_default()
                .push(rec.salary_in_usd as f64);
        }
    }
    if groups.is_empty() {
        ui.label("No data for France.");
        return;
    }

    let summaries: Vec<(String, stats::FiveNumber)> = groups
        .into_iter()
        .filter_map(|(key, values)| {
            stats::five_number_summary(&values).map(|f| (key.to_string(), f))
        })
        .collect();
    grouped_boxplot(ui, "france_box", &summaries);
}

fn remote_section(ui: &mut Ui, table: &SalaryTable) {
    section_heading(ui, "Remote work and salary");

    let mut groups: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for rec in &table.records {
        groups
            .entry(rec.remote_ratio)
            .or_default()
            .push(rec.salary_in_usd as f64);
    }
    if groups.is_empty() {
        ui.label("No rows to chart.");
        return;
    }

    let summaries: Vec<(String, stats::FiveNumber)> = groups
        .into_iter()
        .filter_map(|(ratio, values)| {
            stats::five_number_summary(&values).map(|f| (format!("{ratio}%"), f))
        })
        .collect();
    grouped_boxplot(ui, "remote_box", &summaries);
}

// ---------------------------------------------------------------------------
// Group aggregates
// ---------------------------------------------------------------------------

fn group_mean_section(ui: &mut Ui, table: &SalaryTable, state: &AppState) {
    section_heading(ui, &format!("Mean salary by {}", state.group_column));

    let means = match stats::group_mean(table, state.group_column.name()) {
        Ok(means) => means,
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
            return;
        }
    };
    if means.is_empty() {
        ui.label("No rows to aggregate.");
        return;
    }

    let labels: Vec<String> = means.iter().map(|(k, _)| k.clone()).collect();
    let cm = ColorMap::from_ordered(&labels);
    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(i, (key, mean))| {
            Bar::new(i as f64, *mean)
                .name(key)
                .fill(cm.color_for(key))
                .width(0.6)
        })
        .collect();

    Plot::new("group_mean")
        .height(260.0)
        .y_axis_label("mean salary (USD)")
        .x_axis_formatter({
            let labels = labels.clone();
            move |mark: GridMark, _range: &RangeInclusive<f64>| categorical_label(&labels, mark)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn median_section(ui: &mut Ui, table: &SalaryTable) {
    section_heading(ui, "Median salary by experience and company size");

    let medians = stats::group_median(table);
    if medians.is_empty() {
        ui.label("No rows to aggregate.");
        return;
    }

    let levels: Vec<String> = {
        let mut seen: Vec<String> = Vec::new();
        for ((level, _), _) in &medians {
            if !seen.contains(level) {
                seen.push(level.clone());
            }
        }
        seen
    };
    let sizes: Vec<String> = {
        let mut seen: Vec<String> = Vec::new();
        for ((_, size), _) in &medians {
            if !seen.contains(size) {
                seen.push(size.clone());
            }
        }
        seen.sort();
        seen
    };
    let cm = ColorMap::from_ordered(&sizes);
    let n_sizes = sizes.len() as f64;
    let width = 0.8 / n_sizes;

    Plot::new("median_by_exp_size")
        .legend(Legend::default())
        .height(260.0)
        .y_axis_label("median salary (USD)")
        .x_axis_formatter({
            let labels = levels.clone();
            move |mark: GridMark, _range: &RangeInclusive<f64>| categorical_label(&labels, mark)
        })
        .show(ui, |plot_ui| {
            for (si, size) in sizes.iter().enumerate() {
                let mut bars = Vec::new();
                for (li, level) in levels.iter().enumerate() {
                    let median = medians
                        .iter()
                        .find(|((l, s), _)| l == level && s == size)
                        .map(|(_, m)| *m);
                    if let Some(median) = median {
                        let x = li as f64 + (si as f64 - (n_sizes - 1.0) / 2.0) * width;
                        bars.push(
                            Bar::new(x, median)
                                .name(format!("{level} / {size}"))
                                .fill(cm.color_for(size))
                                .width(width * 0.9),
                        );
                    }
                }
                plot_ui.bar_chart(BarChart::new(bars).name(size).color(cm.color_for(size)));
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn correlation_section(ui: &mut Ui, table: &SalaryTable) {
    section_heading(ui, "Correlation between numeric variables");

    let corr = stats::correlation(table);
    if corr.is_empty() {
        ui.label("Not enough numeric columns to correlate.");
        return;
    }

    Grid::new("correlation")
        .spacing([6.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for col in &corr.columns {
                ui.strong(*col);
            }
            ui.end_row();

            for (i, row_col) in corr.columns.iter().enumerate() {
                ui.strong(*row_col);
                for j in 0..corr.columns.len() {
                    let v = corr.get(i, j);
                    if v.is_nan() {
                        ui.label("–");
                    } else {
                        ui.label(
                            RichText::new(format!(" {v:+.2} "))
                                .monospace()
                                .background_color(diverging(v))
                                .color(Color32::BLACK),
                        );
                    }
                }
                ui.end_row();
            }
        });
    ui.label("Blue cells trend negative, red cells positive.");
}

// ---------------------------------------------------------------------------
// Yearly trend
// ---------------------------------------------------------------------------

fn trend_section(ui: &mut Ui, table: &SalaryTable, state: &AppState) {
    section_heading(
        ui,
        &format!("Salary evolution (top {} roles)", state.trend_top_n),
    );

    let trend = stats::yearly_trend(table, state.trend_top_n);
    if trend.is_empty() {
        ui.label("No rows to chart.");
        return;
    }

    let titles = stats::top_job_titles(table, state.trend_top_n);
    let cm = ColorMap::from_ordered(&titles);

    Plot::new("trend")
        .legend(Legend::default())
        .height(280.0)
        .x_axis_label("work year")
        .y_axis_label("mean salary (USD)")
        .show(ui, |plot_ui| {
            for title in &titles {
                let points: PlotPoints = trend
                    .iter()
                    .filter(|p| &p.job_title == title)
                    .map(|p| [p.work_year as f64, p.mean_salary])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(title)
                        .color(cm.color_for(title))
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Filter result sections
// ---------------------------------------------------------------------------

fn range_section(ui: &mut Ui, state: &AppState) {
    section_heading(ui, "Salary range filter");

    if let Some(err) = &state.range_error {
        ui.colored_label(Color32::RED, err.as_str());
        return;
    }
    match state.range_count {
        Some(0) => {
            ui.label("No profiles in the selected range.");
        }
        Some(n) => {
            ui.label(format!(
                "Profiles between {} and {} USD: {n}",
                state.salary_range.0, state.salary_range.1
            ));
        }
        None => {
            ui.label("Adjust the salary range in the side panel.");
        }
    }
}

fn advanced_section(ui: &mut Ui, state: &AppState) {
    section_heading(ui, "Advanced filtering");

    if let Some(err) = &state.filter_error {
        ui.colored_label(Color32::RED, err.as_str());
        return;
    }
    let Some(subset) = &state.advanced else {
        return;
    };

    if subset.is_empty() {
        ui.label("Select at least one experience level and one company size to see rows.");
        return;
    }

    ui.label(format!(
        "{} rows match the selected experience levels and company sizes.",
        subset.len()
    ));
    record_grid(ui, "advanced_rows", &subset.records, 20);
    if subset.len() > 20 {
        ui.label(format!("… and {} more rows.", subset.len() - 20));
    }
}
