//! Correlation coefficients with two-sided significance.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::dist::{normal_sf, student_t_two_sided};
use crate::error::{require_finite, require_len, require_same_len, Result, StatsError};
use crate::ranking::{rank_average, tie_group_sizes};
use crate::rescaled;

const PEARSON: &str = "Pearson correlation";
const SPEARMAN: &str = "Spearman correlation";
const KENDALL: &str = "Kendall tau";

/// Sample size up to which Kendall's tau uses the exact null distribution
pub const KENDALL_EXACT_LIMIT: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
}

fn check_pair(procedure: &'static str, x: &[f64], y: &[f64], required: usize) -> Result<()> {
    require_same_len(x, y)?;
    require_len(procedure, x, required)?;
    require_finite(x)?;
    require_finite(y)
}

/// Correlation is scale-free, so each input is rescaled before the sums of squares
fn product_moment(procedure: &'static str, x: &[f64], y: &[f64]) -> Result<f64> {
    let (x, y) = (rescaled(x), rescaled(y));
    let (mx, my) = (x.iter().mean(), y.iter().mean());
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(&y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx) * (a - mx);
        syy += (b - my) * (b - my);
    }
    if sxx == 0.0 || syy == 0.0 {
        return Err(StatsError::degenerate(procedure, "an input is constant"));
    }
    let r = sxy / (sxx * syy).sqrt();
    if !r.is_finite() {
        return Err(StatsError::degenerate(procedure, "the coefficient is not finite"));
    }
    Ok(r.clamp(-1.0, 1.0))
}

fn t_significance(r: f64, n: usize) -> Result<f64> {
    if n <= 2 {
        return Ok(1.0);
    }
    if r.abs() == 1.0 {
        return Ok(0.0);
    }
    let df = (n - 2) as f64;
    let t = r * (df / ((1.0 + r) * (1.0 - r))).sqrt();
    student_t_two_sided(t, df)
}

/// Pearson product-moment correlation
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation> {
    check_pair(PEARSON, x, y, 2)?;
    let coefficient = product_moment(PEARSON, x, y)?;
    let p_value = t_significance(coefficient, x.len())?;
    debug!(coefficient, p_value, "pearson");
    Ok(Correlation {
        coefficient,
        p_value,
    })
}

/// Spearman rank correlation (Pearson on average ranks)
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Correlation> {
    check_pair(SPEARMAN, x, y, 3)?;
    let coefficient = product_moment(SPEARMAN, &rank_average(x), &rank_average(y))?;
    let p_value = t_significance(coefficient, x.len())?;
    debug!(coefficient, p_value, "spearman");
    Ok(Correlation {
        coefficient,
        p_value,
    })
}

/// Kendall's tau-b with tie adjustment
pub fn kendall_tau(x: &[f64], y: &[f64]) -> Result<Correlation> {
    check_pair(KENDALL, x, y, 2)?;
    let n = x.len();

    let (mut concordant, mut discordant) = (0_u64, 0_u64);
    for i in 0..n {
        for j in (i + 1)..n {
            let sign = (x[i] - x[j]) * (y[i] - y[j]);
            if sign > 0.0 {
                concordant += 1;
            } else if sign < 0.0 {
                discordant += 1;
            }
        }
    }

    let total = (n * (n - 1) / 2) as u64;
    let x_ties = tie_group_sizes(x);
    let y_ties = tie_group_sizes(y);
    let tied_pairs = |sizes: &[usize]| sizes.iter().map(|&t| (t * (t - 1) / 2) as u64).sum::<u64>();
    let (x_tied, y_tied) = (tied_pairs(x_ties.as_slice()), tied_pairs(y_ties.as_slice()));
    if x_tied == total || y_tied == total {
        return Err(StatsError::degenerate(KENDALL, "an input is constant"));
    }

    let difference = concordant as f64 - discordant as f64;
    let tau = (difference / (((total - x_tied) as f64) * ((total - y_tied) as f64)).sqrt())
        .clamp(-1.0, 1.0);

    let smaller = discordant.min(total - discordant);
    let exact = x_ties.is_empty()
        && y_ties.is_empty()
        && (n <= KENDALL_EXACT_LIMIT || smaller <= 1);
    let p_value = if exact {
        kendall_exact_p(n, smaller as usize)
    } else {
        let z = difference / kendall_variance(n, &x_ties, &y_ties).sqrt();
        (2.0 * normal_sf(z.abs())?).min(1.0)
    };

    debug!(tau, exact, p_value, "kendall tau");
    Ok(Correlation {
        coefficient: tau,
        p_value,
    })
}

/// Two-sided exact p-value for `c` discordant pairs among `n` untied items
fn kendall_exact_p(n: usize, c: usize) -> f64 {
    let factorial = |k: usize| (1..=k).fold(1.0_f64, |acc, i| acc * i as f64);
    let p = if n <= 2 {
        1.0
    } else if c == 0 {
        2.0 / factorial(n)
    } else if c == 1 {
        2.0 / factorial(n - 1)
    } else if 4 * c == n * (n - 1) {
        1.0
    } else {
        // counts of permutations of j items by number of inversions, truncated at c
        let mut counts = vec![0.0_f64; c + 1];
        counts[0] = 1.0;
        counts[1] = 1.0;
        for j in 3..=n {
            let mut running = 0.0;
            let cumulative: Vec<f64> = counts
                .iter()
                .map(|v| {
                    running += v;
                    running
                })
                .collect();
            for k in 0..=c {
                counts[k] = cumulative[k] - if k >= j { cumulative[k - j] } else { 0.0 };
            }
        }
        2.0 * counts.iter().sum::<f64>() / factorial(n)
    };
    p.min(1.0)
}

fn kendall_variance(n: usize, x_ties: &[usize], y_ties: &[usize]) -> f64 {
    let nf = n as f64;
    let m = nf * (nf - 1.0);
    let moments = |sizes: &[usize]| {
        sizes.iter().fold((0.0, 0.0, 0.0), |(t0, t1, t2), &t| {
            let t = t as f64;
            (
                t0 + t * (t - 1.0),
                t1 + t * (t - 1.0) * (t - 2.0),
                t2 + t * (t - 1.0) * (2.0 * t + 5.0),
            )
        })
    };
    let (x0, x1, x2) = moments(x_ties);
    let (y0, y1, y2) = moments(y_ties);

    let mut variance = (m * (2.0 * nf + 5.0) - x2 - y2) / 18.0 + x0 * y0 / (2.0 * m);
    if n > 2 {
        variance += x1 * y1 / (9.0 * m * (nf - 2.0));
    }
    variance
}
