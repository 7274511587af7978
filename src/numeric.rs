//! Numeric services for the elite strategy.
//!
//! The elite strategy approximates the fitness landscape one dimension at
//! a time. It needs three services, each behind a trait so callers can
//! substitute their own:
//!
//! - [`CurveFitter`]: fits a curve through `(coordinate, quality)` samples
//! - [`Differentiator`]: differentiates a fitted curve
//! - [`EquationSolver`]: finds a root of a curve within a range
//!
//! The defaults work on [`Polynomial`]s: least-squares fitting, exact
//! differentiation and bisection.

use crate::error::{FwaError, Result};
use crate::model::Range;

/// A polynomial in a normalized variable `t = (x - center) / scale`.
///
/// Coefficients are in ascending order of power. Normalization keeps the
/// least-squares system well conditioned for coordinates far from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl Polynomial {
    /// `Σ c_i · x^i`.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self::normalized(coefficients, 0.0, 1.0)
    }

    /// `Σ c_i · ((x - center) / scale)^i`.
    pub fn normalized(coefficients: Vec<f64>, center: f64, scale: f64) -> Self {
        let coefficients = if coefficients.is_empty() {
            vec![0.0]
        } else {
            coefficients
        };
        Self {
            coefficients,
            center,
            scale,
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluates the polynomial with Horner's scheme.
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }

    /// The exact derivative with respect to `x`.
    pub fn derivative(&self) -> Polynomial {
        if self.coefficients.len() <= 1 {
            return Polynomial::normalized(vec![0.0], self.center, self.scale);
        }
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, &c)| power as f64 * c / self.scale)
            .collect();
        Polynomial::normalized(coefficients, self.center, self.scale)
    }
}

/// Fits a curve through sample points.
pub trait CurveFitter: Send + Sync {
    fn approximate(&self, xs: &[f64], ys: &[f64]) -> Result<Polynomial>;
}

/// Differentiates a curve.
pub trait Differentiator: Send + Sync {
    fn differentiate(&self, function: &Polynomial) -> Polynomial;
}

/// Finds a root of a curve within a range.
pub trait EquationSolver: Send + Sync {
    fn solve(&self, function: &Polynomial, range: &Range) -> Result<f64>;
}

/// Least-squares polynomial fit of a fixed degree.
///
/// The degree is lowered to `n - 1` when fewer than `degree + 1` distinct
/// samples are available.
#[derive(Debug, Clone, Copy)]
pub struct LeastSquaresFitter {
    pub degree: usize,
}

impl Default for LeastSquaresFitter {
    /// Quadratic fit, the approximation used by the elite strategy.
    fn default() -> Self {
        Self { degree: 2 }
    }
}

impl CurveFitter for LeastSquaresFitter {
    fn approximate(&self, xs: &[f64], ys: &[f64]) -> Result<Polynomial> {
        if xs.len() != ys.len() {
            return Err(FwaError::DimensionMismatch {
                expected: xs.len(),
                actual: ys.len(),
            });
        }
        if xs.is_empty() {
            return Err(FwaError::Empty("samples"));
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(FwaError::Numeric("samples must be finite".into()));
        }

        let n = xs.len();
        let center = xs.iter().sum::<f64>() / n as f64;
        let spread = xs.iter().map(|x| (x - center).abs()).fold(0.0, f64::max);
        let scale = if spread > 0.0 { spread } else { 1.0 };
        let ts: Vec<f64> = xs.iter().map(|x| (x - center) / scale).collect();

        let mut distinct = xs.to_vec();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();
        let degree = self.degree.min(distinct.len() - 1);
        let size = degree + 1;

        // Normal equations: (VᵀV) c = Vᵀy
        let mut matrix = vec![vec![0.0; size + 1]; size];
        for (&t, &y) in ts.iter().zip(ys) {
            let powers: Vec<f64> = (0..2 * size).scan(1.0, |p, _| {
                let current = *p;
                *p *= t;
                Some(current)
            })
            .collect();
            for (i, row) in matrix.iter_mut().enumerate() {
                for j in 0..size {
                    row[j] += powers[i + j];
                }
                row[size] += y * powers[i];
            }
        }

        let coefficients = solve_linear_system(matrix)?;
        Ok(Polynomial::normalized(coefficients, center, scale))
    }
}

/// Gaussian elimination with partial pivoting on an augmented matrix.
fn solve_linear_system(mut matrix: Vec<Vec<f64>>) -> Result<Vec<f64>> {
    let size = matrix.len();
    let magnitude = matrix
        .iter()
        .flat_map(|row| row[..size].iter())
        .fold(0.0f64, |m, v| m.max(v.abs()));
    let singular_below = magnitude.max(1.0) * 1e-12;

    for col in 0..size {
        let pivot = (col..size)
            .max_by(|&a, &b| {
                matrix[a][col]
                    .abs()
                    .partial_cmp(&matrix[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if matrix[pivot][col].abs() < singular_below {
            return Err(FwaError::Numeric(
                "least-squares system is singular".into(),
            ));
        }
        matrix.swap(col, pivot);

        for row in (col + 1)..size {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..=size {
                matrix[row][k] -= factor * matrix[col][k];
            }
        }
    }

    let mut solution = vec![0.0; size];
    for row in (0..size).rev() {
        let tail: f64 = ((row + 1)..size)
            .map(|k| matrix[row][k] * solution[k])
            .sum();
        solution[row] = (matrix[row][size] - tail) / matrix[row][row];
    }
    Ok(solution)
}

/// Exact polynomial differentiation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolynomialDifferentiator;

impl Differentiator for PolynomialDifferentiator {
    fn differentiate(&self, function: &Polynomial) -> Polynomial {
        function.derivative()
    }
}

/// Bisection root finder.
///
/// Requires the function to change sign over the range (or vanish at an
/// end point).
#[derive(Debug, Clone, Copy)]
pub struct BisectionSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BisectionSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
        }
    }
}

impl EquationSolver for BisectionSolver {
    fn solve(&self, function: &Polynomial, range: &Range) -> Result<f64> {
        if !range.is_finite() {
            return Err(FwaError::Numeric(format!(
                "cannot bisect unbounded range {range}"
            )));
        }

        let (mut lo, mut hi) = (range.minimum(), range.maximum());
        let (mut f_lo, f_hi) = (function.evaluate(lo), function.evaluate(hi));
        if f_lo == 0.0 {
            return Ok(lo);
        }
        if f_hi == 0.0 {
            return Ok(hi);
        }
        if f_lo.signum() == f_hi.signum() || f_lo.is_nan() || f_hi.is_nan() {
            return Err(FwaError::Numeric(format!(
                "no sign change over {range}"
            )));
        }

        for _ in 0..self.max_iterations {
            let mid = lo + (hi - lo) / 2.0;
            if hi - lo <= self.tolerance {
                return Ok(mid);
            }
            let f_mid = function.evaluate(mid);
            if f_mid == 0.0 {
                return Ok(mid);
            }
            if f_mid.signum() == f_lo.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }
        Ok(lo + (hi - lo) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polynomial_evaluate_and_derivative() {
        // 1 + 2x + 3x²
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.degree(), 2);
        assert_eq!(p.evaluate(2.0), 17.0);

        let dp = p.derivative();
        assert_eq!(dp.coefficients(), &[2.0, 6.0]);
        assert_eq!(dp.evaluate(1.0), 8.0);

        let constant = Polynomial::new(vec![5.0]).derivative();
        assert_eq!(constant.evaluate(3.0), 0.0);
    }

    #[test]
    fn test_normalized_derivative() {
        // (x - 2)² / 4 expressed in t = (x - 2) / 2 → t²
        let p = Polynomial::normalized(vec![0.0, 0.0, 1.0], 2.0, 2.0);
        assert!((p.evaluate(4.0) - 1.0).abs() < 1e-12);
        // d/dx (x - 2)² / 4 = (x - 2) / 2
        let dp = p.derivative();
        assert!((dp.evaluate(4.0) - 1.0).abs() < 1e-12);
        assert!(dp.evaluate(2.0).abs() < 1e-12);
    }

    #[test]
    fn test_least_squares_recovers_quadratic() {
        let xs: Vec<f64> = (0..7).map(|i| i as f64 * 3.0 - 5.0).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * (x - 1.5) * (x - 1.5) + 4.0).collect();

        let fit = LeastSquaresFitter::default().approximate(&xs, &ys).unwrap();
        for (&x, &y) in xs.iter().zip(&ys) {
            assert!((fit.evaluate(x) - y).abs() < 1e-8);
        }
        assert!((fit.evaluate(1.5) - 4.0).abs() < 1e-8);
    }

    #[test]
    fn test_least_squares_lowers_degree() {
        let fit = LeastSquaresFitter { degree: 4 }
            .approximate(&[0.0, 2.0], &[1.0, 5.0])
            .unwrap();
        assert_eq!(fit.degree(), 1);
        assert!((fit.evaluate(1.0) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_least_squares_rejects_degenerate_samples() {
        let fitter = LeastSquaresFitter::default();
        assert!(fitter.approximate(&[], &[]).is_err());
        assert!(fitter.approximate(&[1.0], &[1.0, 2.0]).is_err());
        assert!(matches!(
            fitter.approximate(&[0.0, f64::NAN], &[1.0, 2.0]),
            Err(FwaError::Numeric(_))
        ));
    }

    #[test]
    fn test_repeated_abscissa_fits_constant() {
        let fit = LeastSquaresFitter::default()
            .approximate(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0])
            .unwrap();
        assert_eq!(fit.degree(), 0);
        assert!((fit.evaluate(5.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_system() {
        let matrix = vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]];
        assert!(matches!(solve_linear_system(matrix), Err(FwaError::Numeric(_))));
    }

    #[test]
    fn test_bisection_finds_root() {
        let solver = BisectionSolver::default();
        // x - 1.25
        let p = Polynomial::new(vec![-1.25, 1.0]);
        let range = Range::new(-10.0, 10.0).unwrap();
        let root = solver.solve(&p, &range).unwrap();
        assert!((root - 1.25).abs() < 1e-8);
    }

    #[test]
    fn test_bisection_without_sign_change() {
        let solver = BisectionSolver::default();
        let p = Polynomial::new(vec![1.0, 0.0, 1.0]);
        let range = Range::new(-1.0, 1.0).unwrap();
        assert!(matches!(solver.solve(&p, &range), Err(FwaError::Numeric(_))));

        let unbounded = Range::new(0.0, f64::INFINITY).unwrap();
        assert!(solver.solve(&p, &unbounded).is_err());
    }

    #[test]
    fn test_differentiator_delegates() {
        let p = Polynomial::new(vec![0.0, 0.0, 1.0]);
        assert_eq!(PolynomialDifferentiator.differentiate(&p), p.derivative());
    }
}
