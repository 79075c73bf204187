use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{NumericalDegeneracy, Result};

/// Singular values below `RCOND * σ_max` are treated as zero.
const RCOND: f64 = 1e-12;

/// How the least-squares problem is solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    /// Pseudo-inverse through the singular value decomposition of X.
    /// Returns the minimum-norm solution when X is rank deficient.
    #[default]
    Svd,
    /// β = (XᵀX)⁻¹ Xᵀy.  Loses precision when columns are nearly collinear;
    /// kept for comparison.
    NormalEquations,
}

/// What the solver learned about the design matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveDiagnostics {
    pub solver: Solver,
    /// Numerical rank of X.  Only the SVD solver computes it.
    pub rank: Option<usize>,
    /// Cut-off below which singular values were discarded.
    pub tolerance: Option<f64>,
}

impl Solver {
    /// Find β minimising ‖Xβ − y‖₂.
    pub fn solve(self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(DVector<f64>, SolveDiagnostics)> {
        match self {
            Solver::Svd => solve_svd(x, y),
            Solver::NormalEquations => solve_normal_equations(x, y),
        }
    }
}

fn solve_svd(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(DVector<f64>, SolveDiagnostics)> {
    let (n, k) = x.shape();
    let svd = x
        .clone()
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or(NumericalDegeneracy::SvdFailed)?;

    let sigma_max = svd.singular_values.iter().fold(0.0_f64, |m, &s| m.max(s));
    let default_tol = n.max(k) as f64 * f64::EPSILON * sigma_max;
    let tolerance = default_tol.max(RCOND * sigma_max);

    let rank = svd.rank(tolerance);
    if rank < k {
        log::warn!("Design matrix is rank deficient (rank {rank} < {k} columns); returning the minimum-norm solution");
    }

    let beta = svd
        .solve(y, tolerance)
        .map_err(|_| NumericalDegeneracy::SvdFailed)?;

    Ok((
        beta,
        SolveDiagnostics {
            solver: Solver::Svd,
            rank: Some(rank),
            tolerance: Some(tolerance),
        },
    ))
}

fn solve_normal_equations(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(DVector<f64>, SolveDiagnostics)> {
    let xt = x.transpose();
    let gram = &xt * x;
    let gram_inv = gram.try_inverse().ok_or(NumericalDegeneracy::SingularGram)?;
    let beta = gram_inv * (&xt * y);

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(NumericalDegeneracy::SingularGram.into());
    }

    Ok((
        beta,
        SolveDiagnostics {
            solver: Solver::NormalEquations,
            rank: None,
            tolerance: None,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn svd_solves_simple_line() {
        // y = 2 + 3x on x = [0, 1, 2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let (beta, diag) = Solver::Svd.solve(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
        assert_eq!(diag.rank, Some(2));
    }

    #[test]
    fn svd_reports_rank_of_duplicate_columns() {
        let x = DMatrix::from_row_slice(4, 3, &[
            1.0, 1.0, 1.0, //
            1.0, 2.0, 2.0, //
            1.0, 3.0, 3.0, //
            1.0, 5.0, 5.0,
        ]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 2.5, 5.0]);
        let (beta, diag) = Solver::Svd.solve(&x, &y).unwrap();
        assert_eq!(diag.rank, Some(2));
        // Minimum-norm solution splits the weight evenly between the copies.
        assert!((beta[1] - beta[2]).abs() < 1e-10);
    }

    #[test]
    fn normal_equations_reject_zero_column() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let err = Solver::NormalEquations.solve(&x, &y).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Degenerate(NumericalDegeneracy::SingularGram)
        ));
        // The SVD solver still answers: the mean on the intercept.
        let (beta, _) = Solver::Svd.solve(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!(beta[1].abs() < 1e-10);
    }

    #[test]
    fn solver_names_match_cli() {
        let s: Solver = serde_json::from_str("\"normal-equations\"").unwrap();
        assert_eq!(s, Solver::NormalEquations);
        assert_eq!(Solver::default(), Solver::Svd);
    }
}
