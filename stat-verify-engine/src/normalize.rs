use stat_verify_core::{fields, ComputedResult, ResultValue};
use stat_verify_providers::{
    AdfTest, AndersonDarling, ChiSquaredContingency, Correlation, KpssTest, LinearFit,
    LogisticFit, TestStatistic,
};

/// Conversion of a provider's native output into the common result mapping
pub trait Normalize {
    fn normalize(self) -> ComputedResult;
}

fn critical_mapping(values: Vec<(String, f64)>) -> ResultValue {
    values.into_iter().collect()
}

impl Normalize for TestStatistic {
    fn normalize(self) -> ComputedResult {
        ComputedResult::new()
            .with_field(fields::STATISTIC, self.statistic)
            .with_field(fields::P_VALUE, self.p_value)
    }
}

impl Normalize for Correlation {
    fn normalize(self) -> ComputedResult {
        ComputedResult::new()
            .with_field(fields::CORRELATION_COEFFICIENT, self.coefficient)
            .with_field(fields::P_VALUE, self.p_value)
    }
}

impl Normalize for AndersonDarling {
    fn normalize(self) -> ComputedResult {
        ComputedResult::new()
            .with_field(fields::STATISTIC, self.statistic)
            .with_field(fields::CRITICAL_VALUES, self.critical_values)
            .with_field(fields::SIGNIFICANCE_LEVEL, self.significance_levels)
    }
}

impl Normalize for ChiSquaredContingency {
    fn normalize(self) -> ComputedResult {
        ComputedResult::new()
            .with_field(fields::STATISTIC, self.statistic)
            .with_field(fields::P_VALUE, self.p_value)
            .with_field(fields::DEGREES_OF_FREEDOM, self.dof)
    }
}

impl Normalize for AdfTest {
    fn normalize(self) -> ComputedResult {
        ComputedResult::new()
            .with_field(fields::ADF_STATISTIC, self.statistic)
            .with_field(fields::P_VALUE, self.p_value)
            .with_field(fields::CRITICAL_VALUES, critical_mapping(self.critical_values))
            .with_field(fields::USED_LAG, self.used_lag)
            .with_field(fields::N_OBS, self.n_obs)
    }
}

impl Normalize for KpssTest {
    fn normalize(self) -> ComputedResult {
        ComputedResult::new()
            .with_field(fields::KPSS_STATISTIC, self.statistic)
            .with_field(fields::P_VALUE, self.p_value)
            .with_field(fields::CRITICAL_VALUES, critical_mapping(self.critical_values))
            .with_field(fields::LAGS, self.lags)
    }
}

impl Normalize for LinearFit {
    fn normalize(self) -> ComputedResult {
        ComputedResult::new()
            .with_field(fields::COEFFICIENTS, self.coefficients)
            .with_field(fields::INTERCEPT, self.intercept)
            .with_field(fields::R_SQUARED, self.r_squared)
    }
}

impl Normalize for LogisticFit {
    fn normalize(self) -> ComputedResult {
        ComputedResult::new()
            .with_field(fields::COEFFICIENTS, self.coefficients)
            .with_field(fields::INTERCEPT, self.intercept)
    }
}
