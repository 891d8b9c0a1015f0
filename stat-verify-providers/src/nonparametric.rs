//! Rank-based and distribution-free tests.

use tracing::debug;

use crate::dist::{chi_squared_sf, kolmogorov_sf, normal_sf};
use crate::error::{require_finite, require_len, require_same_len, Result, StatsError};
use crate::ranking::{rank_average, tie_correction_sum};
use crate::TestStatistic;

const MANN_WHITNEY: &str = "Mann-Whitney U";
const WILCOXON: &str = "Wilcoxon signed-rank";
const KRUSKAL_WALLIS: &str = "Kruskal-Wallis";
const FRIEDMAN: &str = "Friedman";
const KOLMOGOROV_SMIRNOV: &str = "Kolmogorov-Smirnov";

/// Largest smaller-sample size for which the exact Mann-Whitney distribution is used
pub const MANN_WHITNEY_EXACT_LIMIT: usize = 8;
/// Largest number of non-zero differences for the exact Wilcoxon distribution
pub const WILCOXON_EXACT_LIMIT: usize = 50;
/// Largest combined size for the exact two-sample Kolmogorov-Smirnov distribution
pub const KOLMOGOROV_SMIRNOV_EXACT_LIMIT: usize = 1000;

/// Mann-Whitney U test, two-sided; the statistic is U of the first sample
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Result<TestStatistic> {
    require_len(MANN_WHITNEY, first, 1)?;
    require_len(MANN_WHITNEY, second, 1)?;
    require_finite(first)?;
    require_finite(second)?;

    let (n1, n2) = (first.len(), second.len());
    let combined: Vec<f64> = first.iter().chain(second).copied().collect();
    let ranks = rank_average(&combined);
    let rank_sum: f64 = ranks[..n1].iter().sum();
    let u1 = rank_sum - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u = u1.max(u2);

    let ties = tie_correction_sum(&combined);
    let exact = n1.min(n2) <= MANN_WHITNEY_EXACT_LIMIT && ties == 0.0;
    let p_value = if exact {
        2.0 * mann_whitney_exact_sf(n1, n2, u.round() as usize)
    } else {
        let n = (n1 + n2) as f64;
        let product = (n1 * n2) as f64;
        let sd = (product / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)))).sqrt();
        if sd == 0.0 {
            return Err(StatsError::degenerate(MANN_WHITNEY, "all values are identical"));
        }
        let z = (u - product / 2.0 - 0.5) / sd;
        2.0 * normal_sf(z)?
    };

    debug!(u1, exact, p_value, "mann-whitney u");
    Ok(TestStatistic::new(u1, p_value))
}

/// `P(U >= u)` under the null, from the Gaussian binomial coefficient `[n1+n2, n1]_q`
fn mann_whitney_exact_sf(n1: usize, n2: usize, u: usize) -> f64 {
    let (small, large) = if n1 <= n2 { (n1, n2) } else { (n2, n1) };
    let max_u = small * large;
    let mut counts = vec![0.0_f64; max_u + 1];
    counts[0] = 1.0;
    for i in 1..=small {
        let grow = large + i;
        for k in (grow..=max_u).rev() {
            counts[k] -= counts[k - grow];
        }
        for k in i..=max_u {
            counts[k] += counts[k - i];
        }
    }
    let total: f64 = counts.iter().sum();
    let tail: f64 = counts.iter().skip(u).sum();
    (tail / total).min(1.0)
}

/// Wilcoxon signed-rank test on `first - second`; zero differences are discarded
pub fn wilcoxon_signed_rank(first: &[f64], second: &[f64]) -> Result<TestStatistic> {
    require_same_len(first, second)?;
    require_finite(first)?;
    require_finite(second)?;

    let differences: Vec<f64> = first
        .iter()
        .zip(second)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();
    if differences.is_empty() {
        return Err(StatsError::degenerate(WILCOXON, "all differences are zero"));
    }
    let had_zeros = differences.len() < first.len();

    let magnitudes: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
    let ranks = rank_average(&magnitudes);
    let (mut positive, mut negative) = (0.0, 0.0);
    for (rank, d) in ranks.iter().zip(&differences) {
        if *d > 0.0 {
            positive += rank;
        } else {
            negative += rank;
        }
    }
    let t = f64::min(positive, negative);

    let n = differences.len();
    let ties = tie_correction_sum(&magnitudes);
    let exact = n <= WILCOXON_EXACT_LIMIT && ties == 0.0 && !had_zeros;
    let p_value = if exact {
        2.0 * wilcoxon_exact_cdf(n, t.round() as usize)
    } else {
        let nf = n as f64;
        let mean = nf * (nf + 1.0) / 4.0;
        let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ties / 48.0;
        let z = (t - mean) / variance.sqrt();
        2.0 * normal_sf(z.abs())?
    };

    debug!(t, n, exact, p_value, "wilcoxon signed-rank");
    Ok(TestStatistic::new(t, p_value))
}

/// `P(T <= t)` for the signed-rank sum of `n` untied differences
fn wilcoxon_exact_cdf(n: usize, t: usize) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0_f64; max_sum + 1];
    counts[0] = 1.0;
    for k in 1..=n {
        for s in (k..=max_sum).rev() {
            counts[s] += counts[s - k];
        }
    }
    let below: f64 = counts.iter().take(t + 1).sum();
    below / 2f64.powi(n as i32)
}

/// Kruskal-Wallis H test with tie correction
pub fn kruskal_wallis(groups: &[&[f64]]) -> Result<TestStatistic> {
    if groups.len() < 2 {
        return Err(StatsError::InvalidArgument(format!(
            "{KRUSKAL_WALLIS} needs at least 2 groups, got {}",
            groups.len()
        )));
    }
    for group in groups {
        require_len(KRUSKAL_WALLIS, group, 1)?;
        require_finite(group)?;
    }

    let combined: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let ranks = rank_average(&combined);
    let n = combined.len() as f64;

    let mut offset = 0;
    let mut weighted = 0.0;
    for group in groups {
        let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        weighted += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }

    let correction = 1.0 - tie_correction_sum(&combined) / (n * n * n - n);
    if correction <= 0.0 {
        return Err(StatsError::degenerate(KRUSKAL_WALLIS, "all values are identical"));
    }
    let h = (12.0 / (n * (n + 1.0)) * weighted - 3.0 * (n + 1.0)) / correction;
    let p_value = chi_squared_sf(h, (groups.len() - 1) as f64)?;
    debug!(h, p_value, "kruskal-wallis");
    Ok(TestStatistic::new(h, p_value))
}

/// Friedman test; each group is one treatment measured on the same subjects
pub fn friedman(groups: &[&[f64]]) -> Result<TestStatistic> {
    if groups.len() < 3 {
        return Err(StatsError::InvalidArgument(format!(
            "{FRIEDMAN} needs at least 3 groups, got {}",
            groups.len()
        )));
    }
    let subjects = groups[0].len();
    for group in groups {
        require_len(FRIEDMAN, group, 1)?;
        require_same_len(groups[0], group)?;
        require_finite(group)?;
    }

    let k = groups.len();
    let mut rank_sums = vec![0.0; k];
    let mut ties = 0.0;
    for subject in 0..subjects {
        let row: Vec<f64> = groups.iter().map(|g| g[subject]).collect();
        for (sum, rank) in rank_sums.iter_mut().zip(rank_average(&row)) {
            *sum += rank;
        }
        ties += tie_correction_sum(&row);
    }

    let (kf, nf) = (k as f64, subjects as f64);
    let correction = 1.0 - ties / (kf * (kf * kf - 1.0) * nf);
    if correction <= 0.0 {
        return Err(StatsError::degenerate(FRIEDMAN, "every subject has identical values"));
    }
    let squares: f64 = rank_sums.iter().map(|r| r * r).sum();
    let statistic =
        (12.0 / (nf * kf * (kf + 1.0)) * squares - 3.0 * nf * (kf + 1.0)) / correction;
    let p_value = chi_squared_sf(statistic, kf - 1.0)?;
    debug!(statistic, p_value, "friedman");
    Ok(TestStatistic::new(statistic, p_value))
}

/// Two-sample Kolmogorov-Smirnov test, two-sided
pub fn kolmogorov_smirnov_2samp(first: &[f64], second: &[f64]) -> Result<TestStatistic> {
    require_len(KOLMOGOROV_SMIRNOV, first, 1)?;
    require_len(KOLMOGOROV_SMIRNOV, second, 1)?;
    require_finite(first)?;
    require_finite(second)?;

    let mut x = first.to_vec();
    let mut y = second.to_vec();
    x.sort_by(f64::total_cmp);
    y.sort_by(f64::total_cmp);
    let (m, n) = (x.len(), y.len());

    // Largest |m·n·(F1 - F2)| as an integer, so the lattice bound below is exact
    let gap = x
        .iter()
        .chain(&y)
        .map(|&v| {
            let below_x = x.partition_point(|&a| a <= v) as i64;
            let below_y = y.partition_point(|&b| b <= v) as i64;
            (below_x * n as i64 - below_y * m as i64).unsigned_abs()
        })
        .max()
        .unwrap_or(0);
    let d = gap as f64 / (m * n) as f64;

    let p_value = if gap == 0 {
        1.0
    } else if m + n <= KOLMOGOROV_SMIRNOV_EXACT_LIMIT {
        1.0 - lattice_paths_inside(m, n, gap) / binomial(m + n, m)
    } else {
        let effective = (m * n) as f64 / (m + n) as f64;
        kolmogorov_sf(d * effective.sqrt())
    };

    debug!(d, p_value, "kolmogorov-smirnov");
    Ok(TestStatistic::new(d, p_value))
}

/// Monotone lattice paths from (0,0) to (m,n) with `|i·n - j·m| < bound` at every step
fn lattice_paths_inside(m: usize, n: usize, bound: u64) -> f64 {
    let inside = |i: usize, j: usize| ((i * n) as i64 - (j * m) as i64).unsigned_abs() < bound;
    let mut row = vec![0.0_f64; n + 1];
    for i in 0..=m {
        for j in 0..=n {
            row[j] = if !inside(i, j) {
                0.0
            } else if i == 0 && j == 0 {
                1.0
            } else {
                let from_left = if j > 0 { row[j - 1] } else { 0.0 };
                let from_below = if i > 0 { row[j] } else { 0.0 };
                from_left + from_below
            };
        }
    }
    row[n]
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}
