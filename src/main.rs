use eframe::egui;
use regression_report::app::ReportApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 400.0])
            .with_min_inner_size([400.0, 250.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Analysis and Report Generator",
        options,
        Box::new(|_cc| Ok(Box::new(ReportApp::default()))),
    )
}
