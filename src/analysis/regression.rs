use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::data::model::{Dataset, NumericColumn};

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("se necesitan al menos dos columnas numéricas")]
    NotEnoughColumns,

    #[error("no hay filas para ajustar el modelo")]
    NoRows,

    #[error("la columna '{0}' contiene valores faltantes o no finitos")]
    NonFinite(String),

    #[error("la columna '{column}' tiene {found} filas, se esperaban {expected}")]
    RowMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("fallo en mínimos cuadrados: {0}")]
    Solver(&'static str),

    #[error("el ajuste produjo valores no finitos (datos fuera de rango)")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Linear model
// ---------------------------------------------------------------------------

/// `y = intercept + Σ weights[j] * x[j]`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// Ordinary least squares of `target` on `features`, with intercept.
    ///
    /// Both sides are centred on their means and the centred system is solved
    /// through an SVD, so a rank-deficient design yields the minimum-norm
    /// weights instead of failing.  The intercept is recovered from the means.
    pub fn fit(features: &[NumericColumn], target: &NumericColumn) -> Result<Self, FitError> {
        if features.is_empty() {
            return Err(FitError::NotEnoughColumns);
        }
        let n = target.values.len();
        if n == 0 {
            return Err(FitError::NoRows);
        }
        for col in features {
            if col.values.len() != n {
                return Err(FitError::RowMismatch {
                    column: col.name.clone(),
                    expected: n,
                    found: col.values.len(),
                });
            }
        }
        for col in features.iter().chain(std::iter::once(target)) {
            if col.values.iter().any(|v| !v.is_finite()) {
                return Err(FitError::NonFinite(col.name.clone()));
            }
        }

        let p = features.len();
        let x_means: Vec<f64> = features.iter().map(|c| mean(&c.values)).collect();
        let y_mean = mean(&target.values);

        let x = DMatrix::from_fn(n, p, |i, j| features[j].values[i] - x_means[j]);
        let y = DVector::from_fn(n, |i, _| target.values[i] - y_mean);
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(FitError::Overflow);
        }

        let svd = x.svd(true, true);
        // Same cut-off as LAPACK's default rcond for gelsd.
        let eps = f64::EPSILON * n.max(p) as f64 * svd.singular_values.max();
        let beta = svd.solve(&y, eps).map_err(FitError::Solver)?;

        let weights: Vec<f64> = beta.iter().copied().collect();
        let intercept = y_mean
            - weights
                .iter()
                .zip(&x_means)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(FitError::Overflow);
        }
        Ok(Self { weights, intercept })
    }

    /// Prediction for a single row of feature values.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    /// Predictions for every row of the given feature columns.
    pub fn predict(&self, features: &[NumericColumn]) -> Vec<f64> {
        let n = features.first().map_or(0, |c| c.values.len());
        (0..n)
            .map(|i| {
                let row: Vec<f64> = features.iter().map(|c| c.values[i]).collect();
                self.predict_row(&row)
            })
            .collect()
    }
}

/// Mean of finite values.  Falls back to summing pre-scaled terms when the
/// plain sum leaves the `f64` range.
fn mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum()
    }
}

// ---------------------------------------------------------------------------
// RegressionResult – model plus in-sample predictions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RegressionResult {
    pub model: LinearModel,
    /// One fitted value per dataset row, in row order.
    pub predictions: Vec<f64>,
}

/// Fit the fixed model (last column on all others) and predict in-sample.
pub fn fit_dataset(dataset: &Dataset) -> Result<RegressionResult, FitError> {
    let (features, target) = dataset
        .features_and_target()
        .ok_or(FitError::NotEnoughColumns)?;

    let model = LinearModel::fit(features, target)?;
    log::debug!(
        "fitted '{}' on {} feature(s): weights={:?} intercept={}",
        target.name,
        features.len(),
        model.weights,
        model.intercept
    );
    let predictions = model.predict(features);
    if predictions.iter().any(|p| !p.is_finite()) {
        return Err(FitError::Overflow);
    }

    Ok(RegressionResult { model, predictions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, values: &[f64]) -> NumericColumn {
        NumericColumn::new(name, values.to_vec())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn recovers_exact_line() {
        let x = col("x", &[0.0, 1.0, 2.0, 3.0, 4.0]);
        let y = col("y", &[1.0, 3.0, 5.0, 7.0, 9.0]);

        let model = LinearModel::fit(&[x.clone()], &y).unwrap();
        assert!(close(model.weights[0], 2.0));
        assert!(close(model.intercept, 1.0));

        for (p, expected) in model.predict(&[x]).iter().zip(&y.values) {
            assert!(close(*p, *expected));
        }
    }

    #[test]
    fn fits_several_features() {
        // y = 1 + 2a - 3b
        let a = col("a", &[0.0, 1.0, 2.0, 0.0, 3.0, 5.0]);
        let b = col("b", &[1.0, 0.0, 4.0, 2.0, 1.0, 3.0]);
        let y: Vec<f64> = a
            .values
            .iter()
            .zip(&b.values)
            .map(|(a, b)| 1.0 + 2.0 * a - 3.0 * b)
            .collect();

        let model = LinearModel::fit(&[a, b], &col("y", &y)).unwrap();
        assert!(close(model.weights[0], 2.0));
        assert!(close(model.weights[1], -3.0));
        assert!(close(model.intercept, 1.0));
    }

    #[test]
    fn least_squares_on_noisy_points() {
        // Closed form: slope = cov(x, y) / var(x)
        let x = col("x", &[1.0, 2.0, 3.0, 4.0]);
        let y = col("y", &[2.0, 3.0, 5.0, 4.0]);

        let model = LinearModel::fit(&[x], &y).unwrap();
        assert!(close(model.weights[0], 0.8));
        assert!(close(model.intercept, 1.5));
    }

    #[test]
    fn duplicated_feature_gets_minimum_norm_weights() {
        let a = col("a", &[1.0, 2.0, 3.0, 4.0]);
        let y = col("y", &[2.0, 4.0, 6.0, 8.0]);

        let model = LinearModel::fit(&[a.clone(), a], &y).unwrap();
        assert!(close(model.weights[0], 1.0));
        assert!(close(model.weights[1], 1.0));
        assert!(close(model.intercept, 0.0));
    }

    #[test]
    fn constant_feature_predicts_the_mean() {
        let x = col("x", &[5.0, 5.0, 5.0]);
        let y = col("y", &[1.0, 2.0, 6.0]);

        let model = LinearModel::fit(&[x.clone()], &y).unwrap();
        assert!(close(model.weights[0], 0.0));
        assert!(close(model.intercept, 3.0));
        assert!(model.predict(&[x]).iter().all(|p| close(*p, 3.0)));
    }

    #[test]
    fn single_row_is_fitted_exactly() {
        let model = LinearModel::fit(&[col("x", &[2.0])], &col("y", &[7.0])).unwrap();
        assert!(close(model.predict_row(&[2.0]), 7.0));
    }

    #[test]
    fn missing_values_are_rejected() {
        let x = col("x", &[1.0, f64::NAN, 3.0]);
        let y = col("y", &[1.0, 2.0, 3.0]);

        assert_eq!(
            LinearModel::fit(&[x], &y),
            Err(FitError::NonFinite("x".to_string()))
        );
    }

    #[test]
    fn mean_of_huge_values_does_not_overflow() {
        let m = mean(&[1e308, 1.5e308, 1.7e308]);
        assert!(m.is_finite());
        assert!((m - 1.4e308).abs() < 1e294);
    }

    #[test]
    fn huge_inputs_never_yield_non_finite_model() {
        let x = col("x", &[1e308, 1.5e308, 1.7e308]);
        let y = col("y", &[1.0, 2.0, 3.0]);

        match LinearModel::fit(&[x.clone()], &y) {
            Ok(model) => {
                assert!(model.intercept.is_finite());
                assert!(model.weights.iter().all(|w| w.is_finite()));
            }
            Err(e) => assert_eq!(e, FitError::Overflow),
        }

        let ds = Dataset::from_columns(vec![x, y]);
        if let Ok(result) = fit_dataset(&ds) {
            assert!(result.predictions.iter().all(|p| p.is_finite()));
        }
    }

    #[test]
    fn out_of_range_centring_is_an_error() {
        // Mean ≈ 5.7e307, so the first centred value is below -f64::MAX.
        let ds = Dataset::from_columns(vec![
            col("x", &[-1.7e308, 1.7e308, 1.7e308]),
            col("y", &[1.0, 2.0, 3.0]),
        ]);
        assert!(matches!(fit_dataset(&ds), Err(FitError::Overflow)));
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let err = LinearModel::fit(&[col("x", &[1.0])], &col("y", &[1.0, 2.0])).unwrap_err();
        assert!(matches!(err, FitError::RowMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn dataset_fit_uses_last_column_as_target() {
        let ds = Dataset::from_columns(vec![
            col("x", &[0.0, 1.0, 2.0]),
            col("y", &[1.0, 3.0, 5.0]),
        ]);
        let result = fit_dataset(&ds).unwrap();
        assert_eq!(result.predictions.len(), 3);
        assert!(close(result.predictions[2], 5.0));

        let single = Dataset::from_columns(vec![col("y", &[1.0, 2.0])]);
        assert!(matches!(fit_dataset(&single), Err(FitError::NotEnoughColumns)));
    }
}
