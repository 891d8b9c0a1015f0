//! Parametric location tests: Student's t (independent and paired) and one-way ANOVA.

use statrs::statistics::Statistics;
use tracing::debug;

use crate::dist::{fisher_sf, student_t_two_sided};
use crate::error::{require_finite, require_len, require_same_len, Result, StatsError};
use crate::TestStatistic;

const STUDENT_T: &str = "Student's t-test";
const PAIRED_T: &str = "paired t-test";
const ANOVA: &str = "one-way ANOVA";

fn sum_of_squares(data: &[f64]) -> f64 {
    let mean = data.iter().mean();
    data.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Statistic as a ratio; zero spread or overflow leaves no finite value to report
fn ratio(procedure: &'static str, numerator: f64, denominator: f64) -> Result<f64> {
    if denominator == 0.0 {
        let reason = if numerator == 0.0 {
            "the data have zero variance"
        } else {
            "the data have zero variance, so the statistic is infinite"
        };
        return Err(StatsError::degenerate(procedure, reason));
    }
    let value = numerator / denominator;
    if !value.is_finite() {
        return Err(StatsError::degenerate(procedure, "the statistic is not finite"));
    }
    Ok(value)
}

/// Independent two-sample t-test assuming equal variances
pub fn student_t(first: &[f64], second: &[f64]) -> Result<TestStatistic> {
    require_len(STUDENT_T, first, 1)?;
    require_len(STUDENT_T, second, 1)?;
    require_finite(first)?;
    require_finite(second)?;

    let (n1, n2) = (first.len() as f64, second.len() as f64);
    let df = n1 + n2 - 2.0;
    if df < 1.0 {
        return Err(StatsError::InsufficientData {
            procedure: STUDENT_T,
            required: 3,
            found: first.len() + second.len(),
        });
    }

    let pooled = (sum_of_squares(first) + sum_of_squares(second)) / df;
    let difference = first.iter().mean() - second.iter().mean();
    let t = ratio(STUDENT_T, difference, (pooled * (1.0 / n1 + 1.0 / n2)).sqrt())?;
    let p_value = student_t_two_sided(t, df)?;
    debug!(t, df, p_value, "student t-test");
    Ok(TestStatistic::new(t, p_value))
}

/// Paired t-test on the element-wise differences `first - second`
pub fn paired_t(first: &[f64], second: &[f64]) -> Result<TestStatistic> {
    require_same_len(first, second)?;
    require_len(PAIRED_T, first, 2)?;
    require_finite(first)?;
    require_finite(second)?;

    let differences: Vec<f64> = first.iter().zip(second).map(|(a, b)| a - b).collect();
    let n = differences.len() as f64;
    let variance = sum_of_squares(&differences) / (n - 1.0);
    let t = ratio(PAIRED_T, differences.iter().mean(), (variance / n).sqrt())?;
    let p_value = student_t_two_sided(t, n - 1.0)?;
    debug!(t, p_value, "paired t-test");
    Ok(TestStatistic::new(t, p_value))
}

/// One-way analysis of variance across two or more groups
pub fn one_way_anova(groups: &[&[f64]]) -> Result<TestStatistic> {
    if groups.len() < 2 {
        return Err(StatsError::InvalidArgument(format!(
            "{ANOVA} needs at least 2 groups, got {}",
            groups.len()
        )));
    }
    for group in groups {
        require_len(ANOVA, group, 1)?;
        require_finite(group)?;
    }

    let k = groups.len() as f64;
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let n = total as f64;
    if total <= groups.len() {
        return Err(StatsError::InsufficientData {
            procedure: ANOVA,
            required: groups.len() + 1,
            found: total,
        });
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n;
    let between: f64 = groups
        .iter()
        .map(|g| g.len() as f64 * (g.iter().mean() - grand_mean).powi(2))
        .sum();
    let within: f64 = groups.iter().map(|g| sum_of_squares(g)).sum();

    let (df_between, df_within) = (k - 1.0, n - k);
    let f = ratio(ANOVA, between / df_between, within / df_within)?;
    let p_value = fisher_sf(f, df_between, df_within)?;
    debug!(f, df_between, df_within, p_value, "one-way anova");
    Ok(TestStatistic::new(f, p_value))
}
