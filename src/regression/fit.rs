use nalgebra::{DMatrix, DVector};

use super::design::Design;
use super::solver::{SolveDiagnostics, Solver};
use crate::error::{DimensionError, Result};

/// Outcome of one least-squares fit.
#[derive(Debug, Clone)]
pub struct Fit {
    /// One entry per design column, same order.
    pub coefficients: DVector<f64>,
    /// Xβ.
    pub fitted: DVector<f64>,
    /// Residual sum of squares, Σ(y − Xβ)².
    pub rss: f64,
    /// Total sum of squares, Σ(y − ȳ)².
    pub tss: f64,
    /// 1 − RSS/TSS, or NaN when the response is constant.
    pub r_squared: f64,
    pub diagnostics: SolveDiagnostics,
}

impl Fit {
    /// Apply the coefficients to another matrix with the same columns.
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(DimensionError::FeatureCount {
                columns: x.ncols(),
                names: self.coefficients.len(),
            }
            .into());
        }
        Ok(x * &self.coefficients)
    }

    pub fn residuals(&self, y: &DVector<f64>) -> DVector<f64> {
        y - &self.fitted
    }

    pub fn is_rank_deficient(&self) -> bool {
        self.diagnostics
            .rank
            .is_some_and(|rank| rank < self.coefficients.len())
    }
}

/// Solve the least-squares problem for `design` and score it.
pub fn fit(design: &Design, solver: Solver) -> Result<Fit> {
    let x = design.x();
    let y = design.y();

    let (coefficients, diagnostics) = solver.solve(x, y)?;
    let fitted = x * &coefficients;
    let rss = (y - &fitted).norm_squared();

    let mean = y.mean();
    let tss = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    let constant = y.iter().all(|v| *v == y[0]);

    let r_squared = if constant || tss == 0.0 {
        log::warn!("Response is constant; R^2 is undefined and reported as NaN");
        f64::NAN
    } else {
        1.0 - rss / tss
    };

    log::info!(
        "Fitted {} coefficients with {:?}: RSS {rss:.6}, TSS {tss:.6}, R^2 {r_squared:.6}",
        coefficients.len(),
        diagnostics.solver
    );

    Ok(Fit {
        coefficients,
        fitted,
        rss,
        tss,
        r_squared,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(k: usize) -> Vec<String> {
        (0..k).map(|j| format!("x{j}")).collect()
    }

    fn design(rows: usize, cols: usize, data: &[f64], y: &[f64]) -> Design {
        Design::new(
            names(cols),
            DMatrix::from_row_slice(rows, cols, data),
            DVector::from_row_slice(y),
        )
        .unwrap()
    }

    #[test]
    fn intercept_only_gives_mean() {
        let y = [1.0, 4.0, 2.0, 7.0, 6.0];
        let d = design(5, 1, &[1.0; 5], &y);
        let fit = fit(&d, Solver::Svd).unwrap();

        assert!((fit.coefficients[0] - 4.0).abs() < 1e-12);
        assert!(fit.r_squared.abs() < 1e-12);
        assert!((fit.rss - fit.tss).abs() < 1e-9);
    }

    #[test]
    fn recovers_exact_linear_combination() {
        let weights = [0.5, 2.0, -3.0, 0.25];
        let n = 20;
        let mut data = Vec::with_capacity(n * weights.len());
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let t = i as f64;
            let row = [1.0, t, ((i * i) % 7) as f64, (t * 0.3).sin()];
            y.push(row.iter().zip(&weights).map(|(a, b)| a * b).sum());
            data.extend_from_slice(&row);
        }
        let d = design(n, weights.len(), &data, &y);

        for solver in [Solver::Svd, Solver::NormalEquations] {
            let fit = fit(&d, solver).unwrap();
            for (got, want) in fit.coefficients.iter().zip(&weights) {
                assert!((got - want).abs() < 1e-8, "{solver:?}: {got} vs {want}");
            }
            assert!((fit.r_squared - 1.0).abs() < 1e-8);
        }
    }

    #[test]
    fn rank_deficient_design_still_projects() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.2, 1.9, 3.4, 3.8, 5.3, 5.9];

        let full: Vec<f64> = a.iter().flat_map(|&v| [1.0, v]).collect();
        let reference = fit(&design(6, 2, &full, &y), Solver::Svd).unwrap();

        let doubled: Vec<f64> = a.iter().flat_map(|&v| [1.0, v, v]).collect();
        let deficient = fit(&design(6, 3, &doubled, &y), Solver::Svd).unwrap();

        assert!(deficient.is_rank_deficient());
        assert_eq!(deficient.diagnostics.rank, Some(2));
        for (p, q) in deficient.fitted.iter().zip(reference.fitted.iter()) {
            assert!((p - q).abs() < 1e-8);
        }
        assert!((deficient.r_squared - reference.r_squared).abs() < 1e-10);
        let split = deficient.coefficients[1] + deficient.coefficients[2];
        assert!((split - reference.coefficients[1]).abs() < 1e-8);
    }

    #[test]
    fn constant_response_has_nan_r_squared() {
        let d = design(3, 2, &[1.0, 1.0, 1.0, 2.0, 1.0, 3.0], &[0.1, 0.1, 0.1]);
        let fit = fit(&d, Solver::Svd).unwrap();
        assert!(fit.r_squared.is_nan());
        assert!(fit.rss < 1e-20);
    }

    #[test]
    fn residuals_sum_to_zero_with_intercept() {
        let d = design(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 4.0], &[1.0, 3.0, 2.0, 5.0]);
        let fit = fit(&d, Solver::Svd).unwrap();
        let total: f64 = fit.residuals(d.y()).iter().sum();
        assert!(total.abs() < 1e-10);
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    }

    #[test]
    fn predict_checks_width() {
        let d = design(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0], &[1.0, 3.0, 5.0]);
        let fit = fit(&d, Solver::Svd).unwrap();
        let new_x = DMatrix::from_row_slice(1, 2, &[1.0, 10.0]);
        let pred = fit.predict(&new_x).unwrap();
        assert!((pred[0] - 21.0).abs() < 1e-9);
        assert!(fit.predict(&DMatrix::from_element(1, 3, 1.0)).is_err());
    }
}
