//! Normality tests for a single sample.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::dist::{chi_squared_sf, normal_cdf, normal_ppf, normal_sf, polyval};
use crate::error::{require_finite, require_len, Result, StatsError};
use crate::{rescaled, TestStatistic};

const SHAPIRO_WILK: &str = "Shapiro-Wilk";
const DAGOSTINO: &str = "D'Agostino K²";
const ANDERSON_DARLING: &str = "Anderson-Darling";

/// Significance levels (percent) of the tabulated Anderson-Darling critical values
pub const ANDERSON_SIGNIFICANCE_LEVELS: [f64; 5] = [15.0, 10.0, 5.0, 2.5, 1.0];
const ANDERSON_NORMAL_CRITICAL: [f64; 5] = [0.576, 0.656, 0.787, 0.918, 1.092];

/// Shapiro-Wilk W test (Royston's AS R94 approximation)
pub fn shapiro_wilk(data: &[f64]) -> Result<TestStatistic> {
    require_len(SHAPIRO_WILK, data, 3)?;
    require_finite(data)?;

    let mut x = data.to_vec();
    x.sort_by(f64::total_cmp);
    let n = x.len();
    if x[n - 1] - x[0] < 1e-19 {
        return Err(StatsError::degenerate(SHAPIRO_WILK, "all values are identical"));
    }

    // W is scale-invariant; rescaling keeps the sums finite for very large inputs
    let x = rescaled(&x);
    let weights = shapiro_coefficients(n)?;
    let mean = x.iter().mean();
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = weights.iter().zip(&x).map(|(a, v)| a * v).sum();
    let w = (numerator * numerator / ss).min(1.0);
    if !w.is_finite() {
        return Err(StatsError::degenerate(SHAPIRO_WILK, "the statistic is not finite"));
    }

    let p_value = shapiro_p_value(w, n)?;
    debug!(n, w, p_value, "shapiro-wilk");
    Ok(TestStatistic::new(w, p_value))
}

/// Full antisymmetric coefficient vector, ordered to match the sorted sample
fn shapiro_coefficients(n: usize) -> Result<Vec<f64>> {
    const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
    const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];

    let half = n / 2;
    let mut a = vec![0.0; half + 1];
    if n == 3 {
        a[1] = 0.5_f64.sqrt();
    } else {
        let an25 = n as f64 + 0.25;
        let mut m = vec![0.0; half + 1];
        let mut summ2 = 0.0;
        for i in 1..=half {
            m[i] = normal_ppf((i as f64 - 0.375) / an25)?;
            summ2 += m[i] * m[i];
        }
        summ2 *= 2.0;
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / (n as f64).sqrt();
        let a1 = polyval(&C1, rsn) - m[1] / ssumm2;

        let (first_free, fac) = if n > 5 {
            let a2 = -m[2] / ssumm2 + polyval(&C2, rsn);
            let fac = ((summ2 - 2.0 * m[1] * m[1] - 2.0 * m[2] * m[2])
                / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
                .sqrt();
            a[2] = a2;
            (3, fac)
        } else {
            let fac = ((summ2 - 2.0 * m[1] * m[1]) / (1.0 - 2.0 * a1 * a1)).sqrt();
            (2, fac)
        };
        a[1] = a1;
        for i in first_free..=half {
            a[i] = -m[i] / fac;
        }
    }

    let mut full = vec![0.0; n];
    for i in 1..=half {
        full[i - 1] = -a[i];
        full[n - i] = a[i];
    }
    Ok(full)
}

fn shapiro_p_value(w: f64, n: usize) -> Result<f64> {
    if n == 3 {
        let p = 6.0 / std::f64::consts::PI * (w.sqrt().asin() - std::f64::consts::PI / 3.0);
        return Ok(p.max(0.0));
    }

    let nf = n as f64;
    let mut y = (1.0 - w).ln();
    let (mean, sd) = if n <= 11 {
        let gamma = -2.273 + 0.459 * nf;
        if y >= gamma {
            return Ok(1e-99);
        }
        y = -(gamma - y).ln();
        (
            polyval(&[0.5440, -0.39978, 0.025054, -6.714e-4], nf),
            polyval(&[1.3822, -0.77857, 0.062767, -0.0020322], nf).exp(),
        )
    } else {
        let ln_n = nf.ln();
        (
            polyval(&[-1.5861, -0.31082, -0.083751, 0.0038915], ln_n),
            polyval(&[-0.4803, -0.082676, 0.0030302], ln_n).exp(),
        )
    };
    normal_sf((y - mean) / sd)
}

/// D'Agostino and Pearson's omnibus K² test combining skewness and kurtosis
pub fn dagostino_k2(data: &[f64]) -> Result<TestStatistic> {
    require_len(DAGOSTINO, data, 8)?;
    require_finite(data)?;

    let n = data.len() as f64;
    let mean = data.iter().mean();
    let moment = |k: i32| data.iter().map(|v| (v - mean).powi(k)).sum::<f64>() / n;
    let (m2, m3, m4) = (moment(2), moment(3), moment(4));
    if m2 == 0.0 {
        return Err(StatsError::degenerate(DAGOSTINO, "sample variance is zero"));
    }

    let z_skew = skewness_z(m3 / m2.powf(1.5), n);
    let z_kurt = kurtosis_z(m4 / (m2 * m2), n)?;
    let k2 = z_skew * z_skew + z_kurt * z_kurt;
    let p_value = chi_squared_sf(k2, 2.0)?;
    debug!(z_skew, z_kurt, k2, p_value, "d'agostino k²");
    Ok(TestStatistic::new(k2, p_value))
}

fn skewness_z(b2: f64, n: f64) -> f64 {
    let y = b2 * ((n + 1.0) * (n + 3.0) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    delta * (y / alpha).asinh()
}

fn kurtosis_z(b2: f64, n: f64) -> Result<f64> {
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let variance = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - expected) / variance.sqrt();
    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * (6.0 * (n + 3.0) * (n + 5.0) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0 + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return Err(StatsError::degenerate(DAGOSTINO, "kurtosis transform is undefined"));
    }
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();
    Ok((term1 - term2) / (2.0 / (9.0 * a)).sqrt())
}

/// Anderson-Darling statistic against a normal with estimated parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndersonDarling {
    pub statistic: f64,
    pub critical_values: Vec<f64>,
    pub significance_levels: Vec<f64>,
}

pub fn anderson_darling(data: &[f64]) -> Result<AndersonDarling> {
    require_len(ANDERSON_DARLING, data, 2)?;
    require_finite(data)?;

    let mut y = data.to_vec();
    y.sort_by(f64::total_cmp);
    let n = y.len();
    let nf = n as f64;
    let mean = y.iter().mean();
    let sd = y.iter().std_dev();
    if sd == 0.0 {
        return Err(StatsError::degenerate(ANDERSON_DARLING, "sample variance is zero"));
    }

    let z: Vec<f64> = y.iter().map(|v| (v - mean) / sd).collect();
    let mut s = 0.0;
    for i in 0..n {
        let lower = normal_cdf(z[i])?.ln();
        let upper = normal_sf(z[n - 1 - i])?.ln();
        s += (2.0 * (i + 1) as f64 - 1.0) / nf * (lower + upper);
    }
    let statistic = -nf - s;

    let adjustment = 1.0 + 4.0 / nf - 25.0 / (nf * nf);
    let critical_values = ANDERSON_NORMAL_CRITICAL
        .iter()
        .map(|c| round_half_even(c / adjustment, 3))
        .collect();

    Ok(AndersonDarling {
        statistic,
        critical_values,
        significance_levels: ANDERSON_SIGNIFICANCE_LEVELS.to_vec(),
    })
}

fn round_half_even(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
