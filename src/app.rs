use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ReportApp {
    pub state: AppState,
}

impl eframe::App for ReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_report();

        // ---- Top panel: status + actions ----
        egui::TopBottomPanel::top("actions").show(ctx, |ui| {
            panels::action_panel(ui, &mut self.state);
        });

        // ---- Central panel: dataset preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dataset_preview(ui, &self.state);
        });
    }
}
