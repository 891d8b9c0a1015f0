//! Linear and logistic regression with an intercept.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, StatsError};
use crate::linalg::{matrix_from_rows, solve_min_norm, LeastSquares};

const LINEAR: &str = "linear regression";
const LOGISTIC: &str = "logistic regression";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Predictor matrix and response vector, checked to be finite and of matching length
fn design_system(predictors: &[Vec<f64>], response: &[f64]) -> Result<(DMatrix<f64>, DVector<f64>)> {
    if predictors.len() != response.len() {
        return Err(StatsError::InvalidArgument(format!(
            "predictors have {} rows but the response has {} values",
            predictors.len(),
            response.len()
        )));
    }
    let x = matrix_from_rows(predictors)?;
    if x.iter().chain(response).any(|v| !v.is_finite()) {
        return Err(StatsError::InvalidArgument(
            "input contains NaN or infinite values".to_string(),
        ));
    }
    Ok((x, DVector::from_column_slice(response)))
}

/// Ordinary least squares with intercept; collinear predictors get the minimum-norm solution
pub fn linear_regression(predictors: &[Vec<f64>], response: &[f64]) -> Result<LinearFit> {
    let (x, y) = design_system(predictors, response)?;
    if y.len() < 2 {
        return Err(StatsError::InsufficientData {
            procedure: LINEAR,
            required: 2,
            found: y.len(),
        });
    }

    let column_means = DVector::from_iterator(x.ncols(), x.column_iter().map(|c| c.mean()));
    let response_mean = y.mean();
    let mut centred = x.clone();
    for (mut column, mean) in centred.column_iter_mut().zip(column_means.iter()) {
        column.add_scalar_mut(-mean);
    }
    let centred_response = y.add_scalar(-response_mean);

    let fit = LeastSquares::fit(&centred, &centred_response)?;
    let intercept = response_mean - fit.coefficients.dot(&column_means);

    let ss_residual = (&y - &x * &fit.coefficients).add_scalar(-intercept).norm_squared();
    let ss_total = centred_response.norm_squared();
    let r_squared = if ss_total == 0.0 {
        if ss_residual == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_residual / ss_total
    };
    if !(intercept.is_finite() && r_squared.is_finite())
        || fit.coefficients.iter().any(|c| !c.is_finite())
    {
        return Err(StatsError::degenerate(LINEAR, "the fit is not finite"));
    }

    debug!(rank = fit.rank, r_squared, "linear regression");
    Ok(LinearFit {
        coefficients: fit.coefficients.iter().copied().collect(),
        intercept,
        r_squared,
    })
}

/// Penalised logistic regression fit parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticOptions {
    /// Inverse L2 regularisation strength; the intercept is not penalised
    pub c: f64,
    pub max_iterations: usize,
    /// Convergence threshold on the largest Newton step component
    pub tolerance: f64,
}

impl Default for LogisticOptions {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticFit {
    /// One row per decision function (a single row for a binary response)
    pub coefficients: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    /// Sorted distinct response values; the second is the positive class
    pub classes: Vec<f64>,
    pub iterations: usize,
}

pub fn logistic_regression(predictors: &[Vec<f64>], response: &[f64]) -> Result<LogisticFit> {
    logistic_regression_with(predictors, response, LogisticOptions::default())
}

/// Binary logistic regression by damped Newton iterations
pub fn logistic_regression_with(
    predictors: &[Vec<f64>],
    response: &[f64],
    options: LogisticOptions,
) -> Result<LogisticFit> {
    let (x, _) = design_system(predictors, response)?;
    if !(options.c > 0.0 && options.c.is_finite()) {
        return Err(StatsError::InvalidArgument(format!(
            "regularisation strength must be positive, got {}",
            options.c
        )));
    }

    let mut classes = response.to_vec();
    classes.sort_by(f64::total_cmp);
    classes.dedup();
    if classes.len() != 2 {
        return Err(StatsError::InvalidArgument(format!(
            "{LOGISTIC} needs exactly two response classes, got {}",
            classes.len()
        )));
    }
    let targets = DVector::from_iterator(
        response.len(),
        response.iter().map(|y| if *y == classes[1] { 1.0 } else { 0.0 }),
    );

    let width = x.ncols();
    let dim = width + 1;
    // trailing column of ones for the intercept
    let design = x.insert_column(width, 1.0);

    let objective = |w: &DVector<f64>| -> f64 {
        let penalty = w.rows(0, width).norm_squared() / 2.0;
        let loss: f64 = (&design * w)
            .iter()
            .zip(targets.iter())
            .map(|(z, t)| softplus(*z) - t * z)
            .sum();
        penalty + options.c * loss
    };

    let mut weights: DVector<f64> = DVector::zeros(dim);
    let mut current = objective(&weights);
    for iteration in 1..=options.max_iterations {
        let mu = (&design * &weights).map(sigmoid);
        let curvature = mu.map(|m| options.c * m * (1.0 - m));
        let weighted = DMatrix::from_fn(design.nrows(), dim, |i, j| design[(i, j)] * curvature[i]);

        let mut gradient = design.tr_mul(&(&mu - &targets)) * options.c;
        let mut hessian = design.tr_mul(&weighted);
        for j in 0..width {
            gradient[j] += weights[j];
            hessian[(j, j)] += 1.0;
        }
        if gradient.iter().chain(hessian.iter()).any(|v| !v.is_finite()) {
            return Err(StatsError::degenerate(
                LOGISTIC,
                "the Newton system overflows; predictors are too large",
            ));
        }

        let step = solve_min_norm(hessian, &gradient)?;
        let mut scale = 1.0;
        let mut candidate: DVector<f64>;
        loop {
            candidate = &weights - &step * scale;
            let value = objective(&candidate);
            if value <= current || scale < 1e-10 {
                current = value;
                break;
            }
            scale /= 2.0;
        }
        weights = candidate;

        let largest = step.amax() * scale;
        trace!(iteration, objective = current, largest, "logistic newton step");
        if largest < options.tolerance {
            if !current.is_finite() || weights.iter().any(|w| !w.is_finite()) {
                return Err(StatsError::degenerate(LOGISTIC, "the fit is not finite"));
            }
            debug!(iteration, "logistic regression converged");
            return Ok(LogisticFit {
                coefficients: vec![weights.rows(0, width).iter().copied().collect()],
                intercept: vec![weights[width]],
                classes,
                iterations: iteration,
            });
        }
    }

    Err(StatsError::NonConvergence {
        procedure: LOGISTIC,
        iterations: options.max_iterations,
    })
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_regression_collinear_predictors() {
        let fit = linear_regression(
            &[vec![1.0, 2.0], vec![2.0, 3.0], vec![3.0, 4.0]],
            &[2.0, 3.0, 4.0],
        )
        .unwrap();
        assert_abs_diff_eq!(fit.coefficients[0], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.coefficients[1], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.intercept, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_multiple_linear_regression() {
        let fit = linear_regression(
            &[
                vec![1.0, 2.0],
                vec![2.0, 1.0],
                vec![3.0, 4.0],
                vec![4.0, 3.0],
                vec![5.0, 6.0],
            ],
            &[3.1, 3.9, 7.2, 7.8, 11.1],
        )
        .unwrap();
        assert_abs_diff_eq!(fit.coefficients[0], 1.348333, epsilon = 1e-6);
        assert_abs_diff_eq!(fit.coefficients[1], 0.641667, epsilon = 1e-6);
        assert_abs_diff_eq!(fit.intercept, 0.521667, epsilon = 1e-6);
        assert_abs_diff_eq!(fit.r_squared, 0.999744, epsilon = 1e-6);
    }

    #[test]
    fn test_linear_regression_constant_response() {
        let fit = linear_regression(&[vec![1.0], vec![2.0], vec![3.0]], &[4.0, 4.0, 4.0]).unwrap();
        assert_abs_diff_eq!(fit.coefficients[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, 4.0, epsilon = 1e-12);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn test_linear_regression_row_mismatch() {
        assert!(matches!(
            linear_regression(&[vec![1.0], vec![2.0]], &[1.0, 2.0, 3.0]),
            Err(StatsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_logistic_regression_single_predictor() {
        let fit = logistic_regression(&[vec![1.0], vec![2.0], vec![3.0]], &[0.0, 1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(fit.coefficients[0][0], 0.701613, epsilon = 1e-6);
        assert_abs_diff_eq!(fit.intercept[0], -0.655671, epsilon = 1e-6);
        assert_eq!(fit.classes, vec![0.0, 1.0]);
    }

    #[test]
    fn test_logistic_regression_needs_two_classes() {
        assert!(matches!(
            logistic_regression(&[vec![1.0], vec![2.0]], &[1.0, 1.0]),
            Err(StatsError::InvalidArgument(_))
        ));
        assert!(logistic_regression(&[vec![1.0], vec![2.0], vec![3.0]], &[0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn test_logistic_regression_rejects_overflowing_predictors() {
        let result = logistic_regression(
            &[vec![1e300], vec![2e300], vec![3e300]],
            &[0.0, 1.0, 1.0],
        );
        assert!(matches!(result, Err(StatsError::Degenerate { .. })));
    }

    #[test]
    fn test_linear_regression_large_scale_predictors() {
        let fit = linear_regression(&[vec![1e150], vec![2e150], vec![3e150]], &[1.0, 2.0, 3.0])
            .unwrap();
        assert_abs_diff_eq!(fit.coefficients[0] * 1e150, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_softplus_is_stable() {
        assert_abs_diff_eq!(softplus(0.0), 2f64.ln(), epsilon = 1e-15);
        assert_abs_diff_eq!(softplus(800.0), 800.0, epsilon = 1e-9);
        assert!(softplus(-800.0) >= 0.0);
    }
}
