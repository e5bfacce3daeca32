use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::Dimension;
use crate::state::AppState;
use crate::ui::{kpi, plot};

const INSIGHTS: [(&str, &str); 3] = [
    (
        "Sales Trends",
        "show seasonal performance. Consider marketing campaigns in months with declining sales.",
    ),
    (
        "Product Category Analysis",
        "reveals top-selling items. Focus on promoting high-performing categories.",
    ),
    (
        "Geographic Distribution",
        "highlights key markets. Explore expansion opportunities in underrepresented regions.",
    ),
];

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let countries = dataset.countries().clone();
    let store_types = dataset.store_types().clone();
    // The picker cannot open on an unbounded range.
    let has_dates = dataset.date_bounds().is_some();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if has_dates {
                date_range_picker(ui, state);
                ui.separator();
            }

            for (dim, all_values) in [
                (Dimension::Country, &countries),
                (Dimension::StoreType, &store_types),
            ] {
                let n_selected = state.selection.values(dim).len();
                let n_total = all_values.len();
                let header_text = format!("Select {}  ({n_selected}/{n_total})", dim.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        for val in all_values {
                            let mut checked = state.selection.values(dim).contains(val);
                            if ui.checkbox(&mut checked, val.as_str()).changed() {
                                state.toggle_value(dim, val);
                            }
                        }
                    });
            }
        });
}

fn date_range_picker(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Date Range");

    let mut start = state.selection.start;
    let mut end = state.selection.end;

    egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut start).id_salt("date_start"));
        ui.end_row();

        ui.label("To");
        ui.add(DatePickerButton::new(&mut end).id_salt("date_end"));
        ui.end_row();
    });

    if ui.small_button("Full range").clicked() {
        state.reset_date_range();
    } else {
        state.set_date_range(start, end);
    }

    if start > end {
        ui.label(RichText::new("Start date is after end date.").color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Central panel – KPIs, charts and insights
// ---------------------------------------------------------------------------

/// Render the dashboard body for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view sales  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("Sales Performance Dashboard").size(28.0));
            ui.label(
                "Use the filters on the left to explore different aspects of sales performance.",
            );
            ui.add_space(8.0);

            let board = &state.dashboard;
            kpi::kpi_row(ui, &board.kpis);
            ui.add_space(12.0);

            if board.visible_rows == 0 {
                ui.label(RichText::new("No rows match the current filters.").italics());
            }

            plot::sales_trend(ui, &board.groups);
            ui.separator();
            plot::sales_by_category(ui, &board.groups, state.category_colors.as_ref());
            ui.separator();
            plot::stores_by_country(ui, &board.groups);
            ui.separator();

            ui.heading("Insights");
            for (topic, text) in INSIGHTS {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.label("•");
                    ui.label(RichText::new(topic).strong());
                    ui.label(text);
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.dashboard.visible_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
