use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use thiserror::Error;

use super::model::{Dataset, NumericColumn};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("extensión de archivo no soportada: .{0}")]
    UnsupportedExtension(String),

    #[error("no se pudo leer el libro: {0}")]
    Workbook(#[from] XlsxError),

    #[error("el libro no contiene hojas")]
    NoWorksheet,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Extensions accepted by the file dialog and by [`load_file`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx"];

/// Load the numeric columns of a spreadsheet.  Dispatch by extension.
///
/// The returned dataset may be empty (no numeric columns, or a header without
/// data rows); deciding what to do with that is up to the caller.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" => load_xlsx(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Read the first worksheet.  Row 0 is the header, every following row is data.
fn load_xlsx(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)??;

    let dataset = numeric_dataset(&range);
    log::debug!(
        "{}: {} sheet rows, kept columns {:?}",
        path.display(),
        range.height(),
        dataset.column_names().collect::<Vec<_>>()
    );
    Ok(dataset)
}

/// Keep only the fully numeric columns of a sheet range, in sheet order.
fn numeric_dataset(range: &Range<Data>) -> Dataset {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Dataset::from_columns(Vec::new());
    };
    let body: Vec<&[Data]> = rows.collect();
    let names = column_names(header);

    let columns = names
        .into_iter()
        .enumerate()
        .filter_map(|(col, name)| {
            let cells = body.iter().map(|row| row.get(col).unwrap_or(&Data::Empty));
            numeric_values(cells).map(|values| NumericColumn::new(name, values))
        })
        .collect();

    Dataset::from_columns(columns)
}

/// Header labels.  Blank cells become `Unnamed: N`; repeated labels get a
/// `.1`, `.2`, … suffix so every column name is unique.
fn column_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {i}"),
                other => other.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

/// Convert a column's cells to `f64`, or `None` if the column is not numeric.
///
/// A column is numeric when every non-empty cell is an integer or a float and
/// at least one cell holds a value.  Empty cells become `NaN`.
fn numeric_values<'a>(cells: impl Iterator<Item = &'a Data>) -> Option<Vec<f64>> {
    let mut any_value = false;
    let values = cells
        .map(|cell| match cell {
            Data::Int(i) => {
                any_value = true;
                Some(*i as f64)
            }
            Data::Float(f) => {
                any_value = true;
                Some(*f)
            }
            Data::Empty => Some(f64::NAN),
            _ => None,
        })
        .collect::<Option<Vec<f64>>>()?;

    any_value.then_some(values)
}
