use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top panel – status label and the two actions
// ---------------------------------------------------------------------------

/// Render the status label and the "Cargar Datos" / "Generar Informe" buttons.
pub fn action_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);

    let text = RichText::new(state.status.to_string());
    let text = if state.status.is_error() {
        text.color(Color32::RED)
    } else {
        text
    };
    ui.horizontal(|ui: &mut Ui| {
        if state.is_busy() {
            ui.spinner();
        }
        ui.label(text);
    });

    ui.add_space(4.0);

    let enabled = !state.is_busy();
    let full_width = egui::vec2(ui.available_width(), 28.0);

    if ui
        .add_enabled(enabled, egui::Button::new("Cargar Datos").min_size(full_width))
        .clicked()
    {
        open_file_dialog(state);
    }

    if ui
        .add_enabled(enabled, egui::Button::new("Generar Informe").min_size(full_width))
        .clicked()
    {
        let ctx = ui.ctx().clone();
        state.start_report(move || ctx.request_repaint());
    }

    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a workbook and load it.  Cancelling leaves everything untouched.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Cargar archivo XLSX")
        .add_filter("Archivos XLSX", SUPPORTED_EXTENSIONS)
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
