//! Least-squares fits over `nalgebra` matrices.
//!
//! Every solve goes through a singular value decomposition; rank-deficient
//! systems get the minimum-norm solution.

use nalgebra::{DMatrix, DVector};

use crate::error::{Result, StatsError};

/// Singular values below this fraction of the largest one are treated as zero
pub const RELATIVE_RANK_TOLERANCE: f64 = 1e-12;

/// Dense matrix from equal-width rows
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 || rows.iter().any(|row| row.len() != width) {
        return Err(StatsError::InvalidArgument(
            "design matrix must be rectangular with at least one column".to_string(),
        ));
    }
    Ok(DMatrix::from_fn(rows.len(), width, |i, j| rows[i][j]))
}

fn rank_cutoff(singular_values: &DVector<f64>) -> f64 {
    singular_values.amax() * RELATIVE_RANK_TOLERANCE
}

fn require_finite_system(matrix: &DMatrix<f64>, rhs: &DVector<f64>) -> Result<()> {
    if matrix.iter().chain(rhs.iter()).any(|v| !v.is_finite()) {
        return Err(StatsError::InvalidArgument(
            "linear system contains NaN or infinite values".to_string(),
        ));
    }
    Ok(())
}

/// Minimum-norm solution of `matrix · x ≈ rhs`
pub fn solve_min_norm(matrix: DMatrix<f64>, rhs: &DVector<f64>) -> Result<DVector<f64>> {
    require_finite_system(&matrix, rhs)?;
    let svd = matrix.svd(true, true);
    let eps = rank_cutoff(&svd.singular_values);
    svd.solve(rhs, eps)
        .map_err(|e| StatsError::InvalidArgument(format!("least-squares solve failed: {}", e)))
}

/// Ordinary least squares without an implicit intercept
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub coefficients: DVector<f64>,
    /// `(XᵀX)⁺`, the covariance of the estimates up to the residual variance
    pub unscaled_covariance: DMatrix<f64>,
    pub residual_sum_of_squares: f64,
    pub rank: usize,
    pub n_obs: usize,
}

impl LeastSquares {
    /// Minimum-norm least-squares solution of `design · β ≈ response`
    pub fn fit(design: &DMatrix<f64>, response: &DVector<f64>) -> Result<Self> {
        if design.nrows() != response.len() {
            return Err(StatsError::InvalidArgument(format!(
                "design has {} rows but the response has {} values",
                design.nrows(),
                response.len()
            )));
        }
        if design.ncols() == 0 {
            return Err(StatsError::InvalidArgument(
                "design matrix needs at least one column".to_string(),
            ));
        }
        require_finite_system(design, response)?;

        let svd = design.clone().svd(true, true);
        let eps = rank_cutoff(&svd.singular_values);
        let rank = svd.rank(eps);
        let coefficients = svd
            .solve(response, eps)
            .map_err(|e| StatsError::InvalidArgument(format!("least-squares solve failed: {}", e)))?;

        // (XᵀX)⁺ = V Σ⁻² Vᵀ over the retained singular values
        let v_t = svd.v_t.as_ref().ok_or_else(|| {
            StatsError::InvalidArgument("singular vectors were not computed".to_string())
        })?;
        let inverse_squares = svd
            .singular_values
            .map(|s| if s > eps { 1.0 / (s * s) } else { 0.0 });
        let unscaled_covariance = v_t.transpose() * DMatrix::from_diagonal(&inverse_squares) * v_t;

        let residual_sum_of_squares = (response - design * &coefficients).norm_squared();

        Ok(Self {
            coefficients,
            unscaled_covariance,
            residual_sum_of_squares,
            rank,
            n_obs: design.nrows(),
        })
    }

    /// Residual degrees of freedom
    pub fn df_residual(&self) -> usize {
        self.n_obs.saturating_sub(self.rank)
    }

    /// Standard error of coefficient `j`; `None` when no residual degrees of freedom remain
    pub fn standard_error(&self, j: usize) -> Option<f64> {
        let df = self.df_residual();
        if df == 0 {
            return None;
        }
        let sigma2 = self.residual_sum_of_squares / df as f64;
        self.unscaled_covariance
            .get((j, j))
            .map(|c| (sigma2 * c).sqrt())
    }

    /// Gaussian log-likelihood at the fitted coefficients
    pub fn log_likelihood(&self) -> f64 {
        let n = self.n_obs as f64;
        -n / 2.0
            * ((2.0 * std::f64::consts::PI).ln() + (self.residual_sum_of_squares / n).ln() + 1.0)
    }

    /// Akaike information criterion counting every fitted coefficient
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.rank as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn design(rows: &[&[f64]]) -> DMatrix<f64> {
        matrix_from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_matrix_from_rows_rejects_ragged_rows() {
        assert!(matrix_from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(matrix_from_rows(&[]).is_err());
    }

    #[test]
    fn test_least_squares_exact_line() {
        let x = design(&[&[1.0, 0.0], &[1.0, 1.0], &[1.0, 2.0]]);
        let fit = LeastSquares::fit(&x, &DVector::from_vec(vec![1.0, 3.0, 5.0])).unwrap();
        assert_relative_eq!(fit.coefficients[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-10);
        assert!(fit.residual_sum_of_squares < 1e-20);
        assert_eq!(fit.rank, 2);
        assert_eq!(fit.df_residual(), 1);
    }

    #[test]
    fn test_least_squares_covariance_matches_gram_inverse() {
        // XᵀX = [[3, 3], [3, 5]], inverse [[5, -3], [-3, 3]] / 6
        let x = design(&[&[1.0, 0.0], &[1.0, 1.0], &[1.0, 2.0]]);
        let fit = LeastSquares::fit(&x, &DVector::from_vec(vec![1.0, 2.0, 4.0])).unwrap();
        assert_relative_eq!(fit.unscaled_covariance[(0, 0)], 5.0 / 6.0, epsilon = 1e-10);
        assert_relative_eq!(fit.unscaled_covariance[(0, 1)], -0.5, epsilon = 1e-10);
        assert_relative_eq!(fit.unscaled_covariance[(1, 1)], 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_least_squares_collinear_columns_get_minimum_norm() {
        let x = design(&[&[1.0, 1.0], &[2.0, 2.0], &[3.0, 3.0]]);
        let fit = LeastSquares::fit(&x, &DVector::from_vec(vec![2.0, 4.0, 6.0])).unwrap();
        assert_eq!(fit.rank, 1);
        assert_relative_eq!(fit.coefficients[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_least_squares_rejects_row_mismatch() {
        let x = design(&[&[1.0], &[2.0]]);
        assert!(LeastSquares::fit(&x, &DVector::from_vec(vec![1.0])).is_err());
    }

    #[test]
    fn test_solve_min_norm_singular_system() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let x = solve_min_norm(m, &DVector::from_vec(vec![2.0, 2.0])).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_solve_min_norm_rejects_non_finite_system() {
        let m = DMatrix::from_row_slice(1, 1, &[f64::INFINITY]);
        assert!(matches!(
            solve_min_norm(m, &DVector::from_vec(vec![1.0])),
            Err(StatsError::InvalidArgument(_))
        ));
    }
}
