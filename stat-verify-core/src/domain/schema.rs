use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result-field names shared by every test family
pub mod fields {
    pub const STATISTIC: &str = "statistic";
    pub const P_VALUE: &str = "p_value";
    pub const CORRELATION_COEFFICIENT: &str = "correlation_coefficient";
    pub const CRITICAL_VALUES: &str = "critical_values";
    pub const SIGNIFICANCE_LEVEL: &str = "significance_level";
    pub const DEGREES_OF_FREEDOM: &str = "dof";
    pub const ADF_STATISTIC: &str = "adf_statistic";
    pub const KPSS_STATISTIC: &str = "kpss_statistic";
    pub const USED_LAG: &str = "used_lag";
    pub const N_OBS: &str = "n_obs";
    pub const LAGS: &str = "lags";
    pub const COEFFICIENTS: &str = "coefficients";
    pub const INTERCEPT: &str = "intercept";
    pub const R_SQUARED: &str = "r_squared";
}

/// Fields a normalized result must expose for its test family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ResultSchema {
    /// `statistic`, `p_value`
    Hypothesis,
    /// `correlation_coefficient`, `p_value`
    Correlation,
    /// `statistic`, `critical_values`, `significance_level`
    DistributionFit,
    /// Named statistic, `p_value`, `critical_values` keyed by level
    Stationarity { statistic_key: &'static str },
    /// `coefficients`, `intercept`, and `r_squared` when requested
    Regression { r_squared: bool },
}

impl ResultSchema {
    pub fn required_fields(&self) -> Vec<&'static str> {
        match self {
            Self::Hypothesis => vec![fields::STATISTIC, fields::P_VALUE],
            Self::Correlation => vec![fields::CORRELATION_COEFFICIENT, fields::P_VALUE],
            Self::DistributionFit => vec![
                fields::STATISTIC,
                fields::CRITICAL_VALUES,
                fields::SIGNIFICANCE_LEVEL,
            ],
            Self::Stationarity { statistic_key } => {
                vec![*statistic_key, fields::P_VALUE, fields::CRITICAL_VALUES]
            }
            Self::Regression { r_squared: true } => {
                vec![fields::COEFFICIENTS, fields::INTERCEPT, fields::R_SQUARED]
            }
            Self::Regression { r_squared: false } => {
                vec![fields::COEFFICIENTS, fields::INTERCEPT]
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hypothesis => "hypothesis",
            Self::Correlation => "correlation",
            Self::DistributionFit => "distribution_fit",
            Self::Stationarity { .. } => "stationarity",
            Self::Regression { .. } => "regression",
        }
    }
}

/// Menu grouping of the test catalog; a test can sit in several groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CatalogGroup {
    HypothesisTests,
    AbTests,
    RegressionTests,
    StationaryTests,
    CorrelationTests,
}

impl CatalogGroup {
    pub const ALL: [CatalogGroup; 5] = [
        Self::HypothesisTests,
        Self::AbTests,
        Self::RegressionTests,
        Self::StationaryTests,
        Self::CorrelationTests,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::HypothesisTests => "hypothesis_tests",
            Self::AbTests => "ab_tests",
            Self::RegressionTests => "regression_tests",
            Self::StationaryTests => "stationary_tests",
            Self::CorrelationTests => "correlation_tests",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::HypothesisTests => "Hypothesis Tests",
            Self::AbTests => "A/B Tests",
            Self::RegressionTests => "Regression Tests",
            Self::StationaryTests => "Stationary Tests",
            Self::CorrelationTests => "Correlation Tests",
        }
    }
}

impl fmt::Display for CatalogGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for CatalogGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' ', '/'], "_");
        Self::ALL
            .into_iter()
            .find(|group| {
                let title = group.title().to_lowercase().replace(['-', ' ', '/'], "_");
                title == wanted || group.slug() == wanted
            })
            .ok_or_else(|| format!("unknown catalog group '{}'", s))
    }
}
