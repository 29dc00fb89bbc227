//! Least-squares polynomial fitting
//!
//! Sizes are divided by their largest magnitude before the Vandermonde
//! system is built; a cubic in raw matrix sizes (10^9 and up) is badly
//! conditioned otherwise. The system is solved through an SVD pseudo-inverse,
//! so rank-deficient systems (fewer distinct points than coefficients) yield
//! the minimum-norm solution instead of failing.

use nalgebra::{DMatrix, DVector};

use crate::metrics;
use crate::{Error, Result};

/// A fitted polynomial with its normalization scale.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedPolynomial {
    /// Coefficients in normalized `x / scale`, highest degree first
    normalized: Vec<f64>,
    scale: f64,
}

impl FittedPolynomial {
    /// Polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.normalized.len().saturating_sub(1)
    }

    /// Coefficients on the original `x` scale, highest degree first.
    #[must_use]
    pub fn coefficients(&self) -> Vec<f64> {
        let degree = self.degree();
        self.normalized
            .iter()
            .enumerate()
            .map(|(index, c)| c / self.scale.powi(power(degree - index)))
            .collect()
    }

    /// Evaluate at an original-scale `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        let x = x / self.scale;
        self.normalized.iter().fold(0.0, |acc, c| acc.mul_add(x, *c))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn power(exponent: usize) -> i32 {
    exponent as i32
}

/// Fit a polynomial of `degree` to `(xs, ys)` by least squares.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the inputs are empty or mismatched or
/// `x` has no usable scale, and [`Error::Other`] if the SVD does not converge
/// or the solution is not finite.
pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<FittedPolynomial> {
    if xs.is_empty() || xs.len() != ys.len() {
        return Err(Error::InvalidInput(format!(
            "need matching non-empty inputs, got {} x and {} y values",
            xs.len(),
            ys.len()
        )));
    }

    let scale = xs.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return Err(Error::InvalidInput(format!(
            "cannot normalize sizes with scale {scale}"
        )));
    }

    let rows = xs.len();
    let cols = degree + 1;
    let vandermonde = DMatrix::from_fn(rows, cols, |i, j| (xs[i] / scale).powi(power(degree - j)));
    let observed = DVector::from_column_slice(ys);

    let svd = vandermonde
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or_else(|| {
            Error::Other("singular value decomposition did not converge".to_string())
        })?;

    // Same cutoff numpy's lstsq uses by default: len * eps relative to the largest singular value
    #[allow(clippy::cast_precision_loss)]
    let tolerance = svd.singular_values.max() * f64::EPSILON * rows.max(cols) as f64;
    let solution = svd
        .solve(&observed, tolerance)
        .map_err(|e| Error::Other(e.to_string()))?;

    if solution.iter().any(|c| !c.is_finite()) {
        return Err(Error::Other("least-squares solution is not finite".to_string()));
    }

    Ok(FittedPolynomial {
        normalized: solution.iter().copied().collect(),
        scale,
    })
}

/// Coefficient of determination of `predicted` against `observed`.
///
/// Returns `None` when the observed values have zero total variance.
#[must_use]
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> Option<f64> {
    let mean = metrics::mean(observed)?;
    let ss_tot: f64 = observed.iter().map(|y| (y - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return None;
    }
    let ss_res: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    Some(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        let poly = fit(&xs, &ys, 1).unwrap();
        let coefficients = poly.coefficients();
        assert_relative_eq!(coefficients[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(coefficients[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(poly.predict(10.0), 21.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_cubic_in_original_scale() {
        let xs = [100.0, 250.0, 500.0, 750.0, 1000.0];
        let ys: Vec<f64> = xs.iter().map(|n: &f64| 2e-9 * n.powi(3)).collect();
        let poly = fit(&xs, &ys, 3).unwrap();

        let coefficients = poly.coefficients();
        assert_eq!(coefficients.len(), 4);
        assert_relative_eq!(coefficients[0], 2e-9, max_relative = 1e-6);
        for (x, y) in xs.iter().zip(&ys) {
            assert_relative_eq!(poly.predict(*x), *y, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_underdetermined_fit_interpolates() {
        // Three points, four cubic coefficients
        let xs = [10.0, 20.0, 30.0];
        let ys = [1.0, 4.0, 2.0];
        let poly = fit(&xs, &ys, 3).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            assert_relative_eq!(poly.predict(*x), *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(fit(&[], &[], 1).is_err());
        assert!(fit(&[1.0, 2.0], &[1.0], 1).is_err());
        assert!(matches!(
            fit(&[0.0, 0.0], &[1.0, 2.0], 1),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_r_squared() {
        assert_eq!(r_squared(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), Some(1.0));
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 2.0]), None);
        // Predicting the mean everywhere scores zero
        assert_relative_eq!(r_squared(&[1.0, 3.0], &[2.0, 2.0]).unwrap(), 0.0);
        // Worse than the mean goes negative
        assert!(r_squared(&[1.0, 3.0], &[3.0, 1.0]).unwrap() < 0.0);
    }
}
