//! Chi-squared test of independence on a contingency table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dist::chi_squared_sf;
use crate::error::{Result, StatsError};

const CHI_SQUARED: &str = "chi-squared contingency";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquaredContingency {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    /// Expected frequencies under independence, same layout as the table
    pub expected: Vec<Vec<f64>>,
}

/// Pearson chi-squared test of independence with Yates' correction for 2×2 tables
pub fn chi_squared_contingency(table: &[Vec<f64>]) -> Result<ChiSquaredContingency> {
    chi_squared_contingency_with(table, true)
}

/// Same as [`chi_squared_contingency`], with the continuity correction switchable
pub fn chi_squared_contingency_with(
    table: &[Vec<f64>],
    correction: bool,
) -> Result<ChiSquaredContingency> {
    let columns = table.first().map_or(0, Vec::len);
    if columns == 0 || table.iter().any(|row| row.len() != columns) {
        return Err(StatsError::InvalidArgument(
            "contingency table must be a non-empty rectangle".to_string(),
        ));
    }
    if table.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(StatsError::InvalidArgument(
            "contingency table cells must be finite and non-negative".to_string(),
        ));
    }

    let row_totals: Vec<f64> = table.iter().map(|row| row.iter().sum()).collect();
    let column_totals: Vec<f64> = (0..columns)
        .map(|j| table.iter().map(|row| row[j]).sum())
        .collect();
    let grand_total: f64 = row_totals.iter().sum();

    let expected: Vec<Vec<f64>> = row_totals
        .iter()
        .map(|r| column_totals.iter().map(|c| r * c / grand_total).collect())
        .collect();
    if expected.iter().flatten().any(|e| *e == 0.0 || !e.is_finite()) {
        return Err(StatsError::degenerate(
            CHI_SQUARED,
            "an expected frequency is zero",
        ));
    }

    let dof = (table.len() - 1) * (columns - 1);
    if dof == 0 {
        return Ok(ChiSquaredContingency {
            statistic: 0.0,
            p_value: 1.0,
            dof,
            expected,
        });
    }

    let yates = correction && dof == 1;
    let mut statistic = 0.0;
    for (observed_row, expected_row) in table.iter().zip(&expected) {
        for (&observed, &e) in observed_row.iter().zip(expected_row) {
            let mut o = observed;
            if yates {
                let gap = e - o;
                o += gap.signum() * gap.abs().min(0.5);
            }
            statistic += (o - e) * (o - e) / e;
        }
    }

    let p_value = chi_squared_sf(statistic, dof as f64)?;
    debug!(statistic, dof, yates, p_value, "chi-squared contingency");
    Ok(ChiSquaredContingency {
        statistic,
        p_value,
        dof,
        expected,
    })
}
