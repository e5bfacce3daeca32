use std::ops::RangeInclusive;

use chrono::{Days, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::{ColorMap, scale_color};
use crate::data::aggregate::GroupedSummaries;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Dates are plotted as days since the Unix epoch (`NaiveDate::default()`).
fn date_to_x(date: NaiveDate) -> f64 {
    (date - NaiveDate::default()).num_days() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    let days = Days::new(x.abs().round() as u64);
    if x < 0.0 {
        NaiveDate::default().checked_sub_days(days)
    } else {
        NaiveDate::default().checked_add_days(days)
    }
}

/// Label only marks that fall on a bar index.
fn category_label(names: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Sales trend (line)
// ---------------------------------------------------------------------------

/// Total sales per day over the filtered view.
pub fn sales_trend(ui: &mut Ui, groups: &GroupedSummaries) {
    ui.heading("Monthly Sales Trend");

    let points: PlotPoints = groups
        .sales_by_date
        .iter()
        .map(|&(date, total)| [date_to_x(date), total])
        .collect();

    Plot::new("sales_trend")
        .height(CHART_HEIGHT)
        .x_axis_label("date")
        .y_axis_label("total_sales")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            x_to_date(mark.value)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|_name, point| match x_to_date(point.x) {
            Some(d) => format!("{d}\n{:.2}", point.y),
            None => String::new(),
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("total_sales")
                    .color(Color32::from_rgb(0x00, 0x70, 0x4A))
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Sales by product category (bar)
// ---------------------------------------------------------------------------

/// One coloured bar per product category.
pub fn sales_by_category(ui: &mut Ui, groups: &GroupedSummaries, colors: Option<&ColorMap>) {
    ui.heading("Sales by Product Category");

    let names: Vec<String> = groups.sales_by_category.keys().cloned().collect();
    let bars: Vec<Bar> = groups
        .sales_by_category
        .iter()
        .enumerate()
        .map(|(i, (category, total))| {
            let fill = colors
                .map(|cm| cm.color_for(category))
                .unwrap_or(Color32::LIGHT_BLUE);
            Bar::new(i as f64, *total).name(category).fill(fill).width(0.7)
        })
        .collect();

    Plot::new("sales_by_category")
        .height(CHART_HEIGHT)
        .x_axis_label("product_category")
        .y_axis_label("total_sales")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&names, mark.value)
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("total_sales"));
        });
}

// ---------------------------------------------------------------------------
// Store count by country (bar on a continuous scale)
// ---------------------------------------------------------------------------

/// Distinct stores per country, coloured by count.
pub fn stores_by_country(ui: &mut Ui, groups: &GroupedSummaries) {
    ui.heading("Store Count by Country");

    let counts = &groups.stores_by_country;
    let min = counts.values().copied().min().unwrap_or(0) as f64;
    let max = counts.values().copied().max().unwrap_or(0) as f64;

    let names: Vec<String> = counts.keys().cloned().collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (country, &count))| {
            Bar::new(i as f64, count as f64)
                .name(country)
                .fill(scale_color(count as f64, min, max))
                .width(0.7)
        })
        .collect();

    Plot::new("stores_by_country")
        .height(CHART_HEIGHT)
        .x_axis_label("country")
        .y_axis_label("store_count")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&names, mark.value)
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("store_count"));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::date;

    #[test]
    fn date_axis_round_trips() {
        let d = date("2024-01-01");
        assert_eq!(date_to_x(d), 19723.0);
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
        assert_eq!(x_to_date(f64::NAN), None);
        assert_eq!(x_to_date(f64::INFINITY), None);
    }

    #[test]
    fn dates_before_the_epoch_have_labels() {
        assert_eq!(x_to_date(-1.0), Some(date("1969-12-31")));
        let d = date("1965-06-15");
        assert!(date_to_x(d) < 0.0);
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
    }

    #[test]
    fn category_labels_only_on_integer_marks() {
        let names = vec!["Beverage".to_string(), "Food".to_string()];
        assert_eq!(category_label(&names, 1.0), "Food");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, 2.0), "");
        assert_eq!(category_label(&names, -1.0), "");
    }
}
