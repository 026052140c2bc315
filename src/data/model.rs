use std::fmt;

// ---------------------------------------------------------------------------
// NumericColumn – one retained spreadsheet column
// ---------------------------------------------------------------------------

/// A named column whose cells are all numeric.
/// Integer cells are widened to `f64`; empty cells are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl NumericColumn {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Whether any cell of the column was empty in the source sheet.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the active table of numeric columns
// ---------------------------------------------------------------------------

/// The numeric part of a loaded spreadsheet, in source column and row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<NumericColumn>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from columns of equal length.
    pub fn from_columns(columns: Vec<NumericColumn>) -> Self {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        debug_assert!(
            columns.iter().all(|c| c.values.len() == n_rows),
            "all columns must have the same number of rows"
        );
        Self { columns, n_rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Number of numeric columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when there is nothing to analyse: no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }

    pub fn columns(&self) -> &[NumericColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of row `index` across all columns.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.n_rows).then(|| self.columns.iter().map(|c| c.values[index]).collect())
    }

    /// Split into feature columns (all but the last) and the target (last).
    ///
    /// Returns `None` unless there are at least two columns.
    pub fn features_and_target(&self) -> Option<(&[NumericColumn], &NumericColumn)> {
        match self.columns.split_last() {
            Some((target, features)) if !features.is_empty() => Some((features, target)),
            _ => None,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows × {} columns", self.n_rows, self.columns.len())
    }
}
