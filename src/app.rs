use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SalesLensApp {
    pub state: AppState,
}

impl SalesLensApp {
    /// Start with `initial` already loaded when a path was given on the
    /// command line.
    pub fn new(initial: Option<&std::path::Path>) -> Self {
        let mut app = Self::default();
        if let Some(path) = initial {
            app.state.open_path(path);
        }
        app
    }
}

impl eframe::App for SalesLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::dashboard(ui, &self.state);
        });
    }
}
