//! Unit-root and stationarity tests for a single time series.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, trace};

use crate::dist::{normal_cdf, polyval};
use crate::error::{require_finite, require_len, Result, StatsError};
use crate::linalg::LeastSquares;

const ADF: &str = "augmented Dickey-Fuller";
const KPSS: &str = "KPSS";

// MacKinnon (1994) p-value surface, constant-only regression, one variable
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) response surfaces `c0 + c1/n + c2/n² + c3/n³`
const ADF_CRITICAL_SURFACES: [(&str, [f64; 4]); 3] = [
    ("1%", [-3.43035, -6.5393, -16.786, -79.433]),
    ("5%", [-2.86154, -2.8903, -4.234, -40.040]),
    ("10%", [-2.56677, -1.5384, -2.809, 0.0]),
];

// Kwiatkowski et al. (1992), level stationarity
const KPSS_CRITICAL: [(&str, f64, f64); 4] = [
    ("10%", 0.347, 0.10),
    ("5%", 0.463, 0.05),
    ("2.5%", 0.574, 0.025),
    ("1%", 0.739, 0.01),
];

/// Critical values keyed by significance level label, e.g. `("5%", -2.86)`
pub type CriticalValues = Vec<(String, f64)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfTest {
    pub statistic: f64,
    pub p_value: f64,
    pub used_lag: usize,
    pub n_obs: usize,
    pub critical_values: CriticalValues,
    /// Information criterion of the selected lag
    pub ic_best: f64,
}

/// Augmented Dickey-Fuller test with a constant, lag length chosen by AIC
pub fn augmented_dickey_fuller(series: &[f64]) -> Result<AdfTest> {
    require_len(ADF, series, 4)?;
    require_finite(series)?;
    if series.iter().all(|v| *v == series[0]) {
        return Err(StatsError::degenerate(ADF, "the series is constant"));
    }

    let n = series.len();
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let max_lag = schwert.min(n / 2 - 2);
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    // Compare every candidate lag on the sample available to the longest one
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let (design, response) = adf_regression(series, &diffs, lag, max_lag);
        let aic = LeastSquares::fit(&design, &response)?.aic();
        trace!(lag, aic, "adf lag candidate");
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }
    let (ic_best, used_lag) = best.unwrap_or((f64::NAN, 0));

    let (design, response) = adf_regression(series, &diffs, used_lag, used_lag);
    let fit = LeastSquares::fit(&design, &response)?;
    let se = fit.standard_error(1).ok_or_else(|| {
        StatsError::degenerate(ADF, "too few observations for the selected lag")
    })?;
    if se == 0.0 || !se.is_finite() {
        return Err(StatsError::degenerate(ADF, "the lagged level has no variation"));
    }
    let statistic = fit.coefficients[1] / se;
    let n_obs = response.len();

    let p_value = mackinnon_p_value(statistic)?;
    let critical_values = ADF_CRITICAL_SURFACES
        .iter()
        .map(|(label, c)| {
            let inv = 1.0 / n_obs as f64;
            (label.to_string(), polyval(c, inv))
        })
        .collect();

    debug!(statistic, p_value, used_lag, n_obs, "augmented dickey-fuller");
    Ok(AdfTest {
        statistic,
        p_value,
        used_lag,
        n_obs,
        critical_values,
        ic_best,
    })
}

/// Rows `[1, y_t, Δy_{t-1}, .., Δy_{t-lag}]` regressing `Δy_t`, starting at `start`
fn adf_regression(
    series: &[f64],
    diffs: &[f64],
    lag: usize,
    start: usize,
) -> (DMatrix<f64>, DVector<f64>) {
    let rows = diffs.len() - start;
    let design = DMatrix::from_fn(rows, lag + 2, |i, j| {
        let t = start + i;
        match j {
            0 => 1.0,
            1 => series[t],
            k => diffs[t - (k - 1)],
        }
    });
    (design, DVector::from_column_slice(&diffs[start..]))
}

fn mackinnon_p_value(statistic: f64) -> Result<f64> {
    if statistic > TAU_MAX {
        return Ok(1.0);
    }
    if statistic < TAU_MIN {
        return Ok(0.0);
    }
    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    normal_cdf(polyval(coefficients, statistic))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpssTest {
    pub statistic: f64,
    pub p_value: f64,
    pub lags: usize,
    pub critical_values: CriticalValues,
}

/// KPSS test for level stationarity with automatic bandwidth selection
pub fn kpss(series: &[f64]) -> Result<KpssTest> {
    require_len(KPSS, series, 3)?;
    require_finite(series)?;

    let n = series.len();
    let nf = n as f64;
    let mean = series.iter().mean();
    let residuals: Vec<f64> = series.iter().map(|v| v - mean).collect();
    let s0_plain: f64 = residuals.iter().map(|r| r * r).sum();
    if s0_plain == 0.0 {
        return Err(StatsError::degenerate(KPSS, "the series is constant"));
    }

    let mut running = 0.0;
    let eta: f64 = residuals
        .iter()
        .map(|r| {
            running += r;
            running * running
        })
        .sum::<f64>()
        / (nf * nf);

    let lags = hobijn_bandwidth(&residuals);
    let mut long_run = s0_plain;
    for i in 1..=lags {
        let weight = 1.0 - i as f64 / (lags as f64 + 1.0);
        long_run += 2.0 * weight * autocovariance_sum(&residuals, i);
    }
    let statistic = eta / (long_run / nf);
    let p_value = kpss_p_value(statistic);

    debug!(statistic, p_value, lags, "kpss");
    Ok(KpssTest {
        statistic,
        p_value,
        lags,
        critical_values: KPSS_CRITICAL
            .iter()
            .map(|(label, value, _)| (label.to_string(), *value))
            .collect(),
    })
}

fn autocovariance_sum(residuals: &[f64], lag: usize) -> f64 {
    residuals[lag..]
        .iter()
        .zip(residuals)
        .map(|(a, b)| a * b)
        .sum()
}

/// Hobijn et al. (1998) data-dependent lag truncation
fn hobijn_bandwidth(residuals: &[f64]) -> usize {
    let n = residuals.len();
    let nf = n as f64;
    let covariance_lags = nf.powf(2.0 / 9.0) as usize;

    let mut s0 = residuals.iter().map(|r| r * r).sum::<f64>() / nf;
    let mut s1 = 0.0;
    for i in 1..=covariance_lags.min(n - 1) {
        let product = autocovariance_sum(residuals, i) / (nf / 2.0);
        s0 += product;
        s1 += i as f64 * product;
    }
    let s_hat = s1 / s0;
    let gamma = 1.1447 * (s_hat * s_hat).powf(1.0 / 3.0);
    let lags = (gamma * nf.powf(1.0 / 3.0)) as usize;
    lags.min(n - 1)
}

/// Linear interpolation in the critical table, clamped to its end points
fn kpss_p_value(statistic: f64) -> f64 {
    let (_, first_value, first_p) = KPSS_CRITICAL[0];
    if statistic <= first_value {
        return first_p;
    }
    for pair in KPSS_CRITICAL.windows(2) {
        let (_, lo, p_lo) = pair[0];
        let (_, hi, p_hi) = pair[1];
        if statistic <= hi {
            return p_lo + (statistic - lo) / (hi - lo) * (p_hi - p_lo);
        }
    }
    KPSS_CRITICAL[KPSS_CRITICAL.len() - 1].2
}
