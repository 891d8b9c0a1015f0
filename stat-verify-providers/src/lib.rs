//! Numeric computation providers.
//!
//! Each provider is a pure function over plain slices returning a native
//! output struct. Callers are expected to have checked the structural shape of
//! their data already; providers only enforce the numeric preconditions of
//! their own procedure (minimum sample sizes, non-degenerate variance, ...).

pub mod contingency;
pub mod correlation;
mod dist;
pub mod error;
pub mod linalg;
pub mod nonparametric;
pub mod normality;
pub mod parametric;
pub mod ranking;
pub mod regression;
pub mod stationarity;

pub use contingency::*;
pub use correlation::*;
pub use error::*;
pub use nonparametric::*;
pub use normality::*;
pub use parametric::*;
pub use regression::*;
pub use stationarity::*;

use serde::{Deserialize, Serialize};

/// Test statistic with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestStatistic {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestStatistic {
    pub fn new(statistic: f64, p_value: f64) -> Self {
        Self {
            statistic,
            p_value: p_value.clamp(0.0, 1.0),
        }
    }
}

/// Values divided by their largest magnitude; sums of squares of the result cannot overflow
pub(crate) fn rescaled(values: &[f64]) -> Vec<f64> {
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / scale).collect()
}
