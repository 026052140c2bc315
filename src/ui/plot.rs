use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Plot, PlotPoints, Points};

use crate::data::model::Dataset;
use crate::state::AppState;

/// Rows shown in the preview table.
const PREVIEW_ROWS: usize = 50;

// ---------------------------------------------------------------------------
// Dataset preview (central panel)
// ---------------------------------------------------------------------------

/// Scatter of the first column against the target, plus the first rows.
pub fn dataset_preview(ui: &mut Ui, state: &AppState) {
    let dataset = match state.workflow.dataset() {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("Cargue un archivo XLSX para ver sus columnas numéricas.");
            });
            return;
        }
    };

    let names: Vec<&str> = dataset.column_names().collect();
    ui.label(format!("{dataset}: {}", names.join(", ")));
    ui.separator();

    if dataset.width() >= 2 {
        scatter(ui, dataset);
        ui.separator();
    }
    table(ui, dataset);
}

fn scatter(ui: &mut Ui, dataset: &Dataset) {
    let columns = dataset.columns();
    let (first, target) = (&columns[0], &columns[columns.len() - 1]);

    let points: PlotPoints = first
        .values
        .iter()
        .zip(&target.values)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| [x, y])
        .collect();

    Plot::new("dataset_preview")
        .height(ui.available_height() * 0.6)
        .x_axis_label(first.name.as_str())
        .y_axis_label(target.name.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .name(&target.name)
                    .color(Color32::RED)
                    .radius(3.0),
            );
        });
}

fn table(ui: &mut Ui, dataset: &Dataset) {
    let shown = dataset.len().min(PREVIEW_ROWS);

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(70.0), dataset.width())
        .header(20.0, |mut header| {
            for name in dataset.column_names() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let i = row.index();
                for column in dataset.columns() {
                    row.col(|ui| {
                        ui.label(format_cell(column.values[i]));
                    });
                }
            });
        });
}

fn format_cell(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{v:.4}")
    }
}
