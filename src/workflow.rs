use std::fmt;
use std::path::{Path, PathBuf};

use crate::data::loader;
use crate::data::model::Dataset;
use crate::report::{build_report, ReportSettings};

// ---------------------------------------------------------------------------
// Status – every message the status label can show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Welcome,
    Loaded(PathBuf),
    NoNumericData,
    LoadFailed(String),
    NeedsData,
    NeedsTwoColumns,
    Generating,
    ReportFailed(String),
    ReportGenerated,
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::NoNumericData
                | Status::LoadFailed(_)
                | Status::NeedsData
                | Status::NeedsTwoColumns
                | Status::ReportFailed(_)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Welcome => write!(f, "Bienvenido a la aplicación de análisis de datos"),
            Status::Loaded(path) => write!(f, "Datos cargados: {}", path.display()),
            Status::NoNumericData => write!(f, "El archivo no contiene datos numéricos."),
            Status::LoadFailed(e) => write!(f, "Error al cargar el archivo: {e}"),
            Status::NeedsData => write!(f, "Por favor, cargue datos válidos primero."),
            Status::NeedsTwoColumns => {
                write!(f, "El archivo debe contener al menos dos columnas numéricas.")
            }
            Status::Generating => write!(f, "Generando informe…"),
            Status::ReportFailed(e) => write!(f, "Error en el análisis de datos: {e}"),
            Status::ReportGenerated => write!(f, "Informe generado exitosamente."),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisWorkflow – owns the active dataset
// ---------------------------------------------------------------------------

/// Load and Report, plus the dataset they share.
#[derive(Debug, Default)]
pub struct AnalysisWorkflow {
    dataset: Option<Dataset>,
    settings: ReportSettings,
}

impl AnalysisWorkflow {
    pub fn new(settings: ReportSettings) -> Self {
        Self {
            dataset: None,
            settings,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Load `path` and make its numeric columns the active dataset.
    ///
    /// A file without numeric data clears the active dataset.  A file that
    /// cannot be read leaves the previous dataset in place.
    pub fn load(&mut self, path: &Path) -> Status {
        match loader::load_file(path) {
            Ok(dataset) if dataset.is_empty() => {
                log::warn!("{}: no numeric data", path.display());
                self.dataset = None;
                Status::NoNumericData
            }
            Ok(dataset) => {
                log::info!(
                    "Loaded {} from {} with columns {:?}",
                    dataset,
                    path.display(),
                    dataset.column_names().collect::<Vec<_>>()
                );
                self.dataset = Some(dataset);
                Status::Loaded(path.to_path_buf())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                Status::LoadFailed(e.to_string())
            }
        }
    }

    /// Check the preconditions and snapshot what a report needs.
    pub fn prepare_report(&self) -> Result<ReportJob, Status> {
        let dataset = match &self.dataset {
            Some(ds) if ds.len() > 0 => ds,
            _ => return Err(Status::NeedsData),
        };
        if dataset.width() < 2 {
            return Err(Status::NeedsTwoColumns);
        }
        Ok(ReportJob {
            dataset: dataset.clone(),
            settings: self.settings.clone(),
        })
    }

    /// Run the whole report on the calling thread.
    pub fn generate_report(&self) -> Status {
        match self.prepare_report() {
            Ok(job) => job.run(),
            Err(status) => status,
        }
    }
}

// ---------------------------------------------------------------------------
// ReportJob – a self-contained report run, movable to a worker thread
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ReportJob {
    dataset: Dataset,
    settings: ReportSettings,
}

impl ReportJob {
    pub fn run(self) -> Status {
        match build_report(&self.dataset, &self.settings) {
            Ok(_) => Status::ReportGenerated,
            Err(e) => {
                log::error!("Report failed: {e}");
                Status::ReportFailed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::pdf::tests::page_strings;
    use crate::testutil::{write_sheet, Cell};

    fn workflow(dir: &Path) -> AnalysisWorkflow {
        AnalysisWorkflow::new(ReportSettings::in_dir(dir))
    }

    fn outputs_exist(wf: &AnalysisWorkflow) -> bool {
        wf.settings().chart_path.exists() || wf.settings().pdf_path.exists()
    }

    /// `y = 2x + 1` for x = 0..rows, plus a text column.
    fn linear_sheet(path: &Path, rows: usize) {
        let data: Vec<Vec<Cell>> = (0..rows)
            .map(|i| {
                let x = i as f64 * 0.75;
                vec![Cell::S("fila"), Cell::N(x), Cell::N(2.0 * x + 1.0)]
            })
            .collect();
        write_sheet(path, &["etiqueta", "x", "y"], &data);
    }

    #[test]
    fn welcome_message() {
        assert_eq!(
            Status::Welcome.to_string(),
            "Bienvenido a la aplicación de análisis de datos"
        );
    }

    #[test]
    fn load_keeps_numeric_columns_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.xlsx");
        linear_sheet(&path, 4);

        let mut wf = workflow(dir.path());
        let status = wf.load(&path);
        assert_eq!(status.to_string(), format!("Datos cargados: {}", path.display()));
        assert!(!status.is_error());

        let ds = wf.dataset().unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.row(3), Some(vec![2.25, 5.5]));
    }

    #[test]
    fn load_without_numeric_data_clears_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("datos.xlsx");
        let text = dir.path().join("texto.xlsx");
        linear_sheet(&good, 3);
        write_sheet(&text, &["nombre"], &[vec![Cell::S("Ana")], vec![Cell::S("Luis")]]);

        let mut wf = workflow(dir.path());
        wf.load(&good);
        let status = wf.load(&text);
        assert_eq!(status.to_string(), "El archivo no contiene datos numéricos.");
        assert!(wf.dataset().is_none());

        assert_eq!(
            wf.generate_report().to_string(),
            "Por favor, cargue datos válidos primero."
        );
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("datos.xlsx");
        let broken = dir.path().join("roto.xlsx");
        linear_sheet(&good, 3);
        std::fs::write(&broken, b"garbage").unwrap();

        let mut wf = workflow(dir.path());
        wf.load(&good);
        let status = wf.load(&broken);
        assert!(matches!(status, Status::LoadFailed(_)));
        assert!(status.to_string().starts_with("Error al cargar el archivo: "));
        assert_eq!(wf.dataset().unwrap().len(), 3);
    }

    #[test]
    fn report_without_data_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let wf = workflow(dir.path());

        let status = wf.generate_report();
        assert_eq!(status, Status::NeedsData);
        assert_eq!(status.to_string(), "Por favor, cargue datos válidos primero.");
        assert!(!outputs_exist(&wf));
    }

    #[test]
    fn report_with_one_column_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("una.xlsx");
        write_sheet(
            &path,
            &["nombre", "y"],
            &[vec![Cell::S("a"), Cell::N(1.0)], vec![Cell::S("b"), Cell::N(2.0)]],
        );

        let mut wf = workflow(dir.path());
        wf.load(&path);
        let status = wf.generate_report();
        assert_eq!(
            status.to_string(),
            "El archivo debe contener al menos dos columnas numéricas."
        );
        assert!(!outputs_exist(&wf));
    }

    #[test]
    fn report_on_exact_line_lists_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.xlsx");
        linear_sheet(&path, 14);

        let mut wf = workflow(dir.path());
        wf.load(&path);
        let status = wf.generate_report();
        assert_eq!(status.to_string(), "Informe generado exitosamente.");

        let png = std::fs::read(&wf.settings().chart_path).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");

        let strings = page_strings(&wf.settings().pdf_path);
        let lines: Vec<&str> = strings
            .iter()
            .map(|(s, _)| s.as_str())
            .filter(|s| s.starts_with("Predicción "))
            .collect();
        assert_eq!(lines.len(), 10);
        for (i, line) in lines.iter().enumerate() {
            let expected = 2.0 * (i as f64 * 0.75) + 1.0;
            assert_eq!(*line, format!("Predicción {}: {expected:.2}", i + 1));
        }
    }

    #[test]
    fn short_dataset_lists_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.xlsx");
        linear_sheet(&path, 3);

        let mut wf = workflow(dir.path());
        wf.load(&path);
        assert_eq!(wf.generate_report(), Status::ReportGenerated);

        let count = page_strings(&wf.settings().pdf_path)
            .iter()
            .filter(|(s, _)| s.starts_with("Predicción "))
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn rerun_overwrites_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let long = dir.path().join("largo.xlsx");
        let short = dir.path().join("corto.xlsx");
        linear_sheet(&long, 12);
        linear_sheet(&short, 2);

        let mut wf = workflow(dir.path());
        wf.load(&long);
        assert_eq!(wf.generate_report(), Status::ReportGenerated);
        let first = std::fs::read(&wf.settings().pdf_path).unwrap();

        assert_eq!(wf.generate_report(), Status::ReportGenerated);
        let second = std::fs::read(&wf.settings().pdf_path).unwrap();
        assert_eq!(first.len(), second.len());

        wf.load(&short);
        assert_eq!(wf.generate_report(), Status::ReportGenerated);
        let strings = page_strings(&wf.settings().pdf_path);
        assert_eq!(
            strings.iter().filter(|(s, _)| s.starts_with("Predicción ")).count(),
            2
        );
    }

    #[test]
    fn missing_values_surface_as_analysis_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huecos.xlsx");
        write_sheet(
            &path,
            &["x", "y"],
            &[
                vec![Cell::N(1.0), Cell::N(2.0)],
                vec![Cell::N(2.0), Cell::Blank],
                vec![Cell::N(3.0), Cell::N(6.0)],
            ],
        );

        let mut wf = workflow(dir.path());
        assert!(matches!(wf.load(&path), Status::Loaded(_)));
        let status = wf.generate_report();
        assert_eq!(
            status.to_string(),
            "Error en el análisis de datos: la columna 'y' contiene valores faltantes o no finitos"
        );
        assert!(!outputs_exist(&wf));
    }

    #[test]
    fn prepared_job_runs_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.xlsx");
        linear_sheet(&path, 5);

        let mut wf = workflow(dir.path());
        wf.load(&path);
        let job = wf.prepare_report().unwrap();
        let status = std::thread::spawn(move || job.run()).join().unwrap();
        assert_eq!(status, Status::ReportGenerated);
    }
}
