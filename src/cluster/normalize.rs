//! Column-wise z-score standardization.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::error::{Error, Result};

/// Fitted per-column means and population standard deviations.
///
/// A column without spread has its mean pinned to its value and a std of
/// `1.0`, so it standardizes to exact zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScore {
    /// Column means.
    pub means: Array1<f64>,
    /// Column standard deviations (divide by `n`). Constant columns hold `1.0`.
    pub stds: Array1<f64>,
    constant: Vec<bool>,
}

impl ZScore {
    /// Fit the scaler to a matrix with at least one row and one column.
    pub fn fit(data: &Array2<f64>) -> Result<Self> {
        let (n, d) = data.dim();
        if n == 0 || d == 0 {
            return Err(Error::EmptyInput);
        }

        let mut means = Array1::zeros(d);
        let mut stds = Array1::ones(d);
        let mut constant = vec![false; d];

        for (j, col) in data.axis_iter(Axis(1)).enumerate() {
            let (lo, hi) = col
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
            if lo == hi {
                // The summed mean of a repeated 0.1 is not 0.1.
                means[j] = lo;
                constant[j] = true;
                continue;
            }

            let mean = col.sum() / n as f64;
            let std = (col.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n as f64).sqrt();
            means[j] = mean;
            if std.is_finite() && std > f64::EPSILON * mean.abs().max(1.0) {
                stds[j] = std;
            } else {
                constant[j] = true;
            }
        }

        Ok(Self { means, stds, constant })
    }

    /// Whether column `j` had no spread when fitted.
    pub fn is_constant(&self, j: usize) -> bool {
        self.constant.get(j).copied().unwrap_or(false)
    }

    /// Standardize rows with the fitted parameters.
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        if data.ncols() != self.means.len() {
            return Err(Error::DimensionMismatch {
                expected: self.means.len(),
                found: data.ncols(),
            });
        }
        Ok((data - &self.means) / &self.stds)
    }

    /// Standardize a single point, e.g. a record that arrived after fitting.
    pub fn transform_point(&self, point: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        if point.len() != self.means.len() {
            return Err(Error::DimensionMismatch {
                expected: self.means.len(),
                found: point.len(),
            });
        }
        Ok((&point - &self.means) / &self.stds)
    }

    /// Fit and transform in one step.
    pub fn fit_transform(data: &Array2<f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(data)?;
        let out = scaler.transform(data)?;
        Ok((scaler, out))
    }
}
