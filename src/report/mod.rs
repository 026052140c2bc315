//! Report layer: chart rendering and PDF assembly.
//!
//! ```text
//!   Dataset
//!      │
//!      ▼
//!   ┌────────────┐
//!   │ regression │  fit last column on the others, predict in-sample
//!   └────────────┘
//!      │
//!      ├──────────────► chart  → analisis_resultado.png
//!      │                  │
//!      ▼                  ▼
//!   ┌───────────────────────┐
//!   │  pdf                   │  title, chart, first ten predictions
//!   └───────────────────────┘
//!              → Informe_analisis_datos.pdf
//! ```
pub mod chart;
pub mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::regression::{fit_dataset, FitError, RegressionResult};
use crate::data::model::Dataset;
use chart::{ChartError, ChartStyle};
use pdf::{PdfError, PdfLayout};

pub const CHART_FILE: &str = "analisis_resultado.png";
pub const PDF_FILE: &str = "Informe_analisis_datos.pdf";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Where the report goes and how it looks.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub chart_path: PathBuf,
    pub pdf_path: PathBuf,
    pub chart: ChartStyle,
    pub pdf: PdfLayout,
}

impl Default for ReportSettings {
    /// Both files in the working directory.
    fn default() -> Self {
        Self {
            chart_path: PathBuf::from(CHART_FILE),
            pdf_path: PathBuf::from(PDF_FILE),
            chart: ChartStyle::default(),
            pdf: PdfLayout::default(),
        }
    }
}

impl ReportSettings {
    /// Default file names, placed in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            chart_path: dir.join(CHART_FILE),
            pdf_path: dir.join(PDF_FILE),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Fit, plot and write both output files.
///
/// The chart is drawn against the first feature column; with several
/// features the remaining ones only take part in the fit.
pub fn build_report(
    dataset: &Dataset,
    settings: &ReportSettings,
) -> Result<RegressionResult, ReportError> {
    let result = fit_dataset(dataset)?;
    let (features, target) = dataset
        .features_and_target()
        .ok_or(FitError::NotEnoughColumns)?;

    if features.len() > 1 {
        log::warn!(
            "{} feature columns; chart plotted against '{}' only",
            features.len(),
            features[0].name
        );
    }

    let img = chart::render_chart(
        &features[0].values,
        &target.values,
        &result.predictions,
        &settings.chart,
    )?;
    chart::save_png(&img, &settings.chart_path)?;
    pdf::write_report(&settings.pdf_path, &img, &result.predictions, &settings.pdf)?;

    log::info!(
        "report written to {} and {}",
        settings.chart_path.display(),
        settings.pdf_path.display()
    );
    Ok(result)
}
