use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::aggregate::KpiSummary;

const TITLE_COLOR: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Render the four headline figures side by side.
pub fn kpi_row(ui: &mut Ui, kpis: &KpiSummary) {
    let cards = [
        ("Total Sales ($)", format_grouped(kpis.total_sales_sum.round())),
        (
            "Avg Order Value ($)",
            kpis.avg_order_value_mean
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "–".to_string()),
        ),
        ("Total Loyalty Members", format_grouped(kpis.loyalty_member_total as f64)),
        ("Total Stores", kpis.distinct_store_count.to_string()),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(title).strong().color(TITLE_COLOR));
                    ui.label(RichText::new(value).size(26.0).strong());
                });
            });
        }
    });
}

/// Format a whole number with comma thousands separators, e.g. `1,234,567`.
pub fn format_grouped(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
