use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use crate::error::{Result, StatsError};

fn distribution_error(err: impl std::fmt::Display) -> StatsError {
    StatsError::Distribution(err.to_string())
}

pub(crate) fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(distribution_error)
}

pub(crate) fn normal_cdf(x: f64) -> Result<f64> {
    Ok(standard_normal()?.cdf(x))
}

pub(crate) fn normal_sf(x: f64) -> Result<f64> {
    Ok(standard_normal()?.sf(x))
}

pub(crate) fn normal_ppf(p: f64) -> Result<f64> {
    Ok(standard_normal()?.inverse_cdf(p))
}

/// Two-sided p-value of a Student-t statistic
pub(crate) fn student_t_two_sided(t: f64, df: f64) -> Result<f64> {
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df).map_err(distribution_error)?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

pub(crate) fn chi_squared_sf(x: f64, df: f64) -> Result<f64> {
    if x.is_infinite() {
        return Ok(0.0);
    }
    let dist = ChiSquared::new(df).map_err(distribution_error)?;
    Ok(dist.sf(x.max(0.0)))
}

pub(crate) fn fisher_sf(f: f64, df_between: f64, df_within: f64) -> Result<f64> {
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(df_between, df_within).map_err(distribution_error)?;
    Ok(dist.sf(f.max(0.0)))
}

/// Survival function of the limiting Kolmogorov distribution
pub(crate) fn kolmogorov_sf(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < 1.0 {
        // Jacobi theta form converges quickly for small arguments
        let factor = (2.0 * std::f64::consts::PI).sqrt() / x;
        let mut cdf = 0.0;
        for k in 1..=20i32 {
            let odd = f64::from(2 * k - 1);
            cdf += (-(odd * odd) * std::f64::consts::PI.powi(2) / (8.0 * x * x)).exp();
        }
        return (1.0 - factor * cdf).clamp(0.0, 1.0);
    }
    let mut sum = 0.0;
    for k in 1..=100i32 {
        let kf = f64::from(k);
        let term = (-2.0 * kf * kf * x * x).exp();
        sum += if k % 2 == 1 { term } else { -term };
        if term < 1e-17 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Horner evaluation of `c[0] + c[1] x + c[2] x² + ...`
pub(crate) fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_tails() {
        assert_relative_eq!(normal_cdf(0.0).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(normal_sf(1.959963984540054).unwrap(), 0.025, epsilon = 1e-9);
        assert_relative_eq!(normal_ppf(0.975).unwrap(), 1.959963984540054, epsilon = 1e-7);
    }

    #[test]
    fn test_kolmogorov_sf_branches_agree() {
        let below = kolmogorov_sf(1.0 - 1e-9);
        let above = kolmogorov_sf(1.0);
        assert_relative_eq!(below, above, epsilon = 1e-6);
        assert_relative_eq!(kolmogorov_sf(1.358), 0.05, epsilon = 1e-3);
    }

    #[test]
    fn test_polyval() {
        assert_relative_eq!(polyval(&[1.0, 2.0, 3.0], 2.0), 17.0);
    }

    #[test]
    fn test_infinite_statistics_have_zero_p_value() {
        assert_eq!(student_t_two_sided(f64::NEG_INFINITY, 3.0).unwrap(), 0.0);
        assert_eq!(chi_squared_sf(f64::INFINITY, 2.0).unwrap(), 0.0);
    }
}
