//! The fixed table of statistical tests known at start-up.

use stat_verify_core::{fields, CatalogGroup, ResultSchema, ShapeDescriptor};

use crate::bindings::{self, ProviderFn};

/// Identifiers of the standard tests
pub mod names {
    pub const SHAPIRO_WILK: &str = "Shapiro-Wilk Test";
    pub const DAGOSTINO_K2: &str = "D'Agostino's K² Test";
    pub const ANDERSON_DARLING: &str = "Anderson-Darling Test";
    pub const KOLMOGOROV_SMIRNOV: &str = "Kolmogorov-Smirnov Test";
    pub const STUDENT_T: &str = "Student's T-test";
    pub const PAIRED_T: &str = "Paired Student's T-test";
    pub const ANOVA: &str = "ANOVA";
    pub const ONE_WAY_ANOVA: &str = "One-Way ANOVA";
    pub const TWO_WAY_ANOVA: &str = "Two-Way ANOVA";
    pub const REPEATED_MEASURES_ANOVA: &str = "Repeated Measures ANOVA";
    pub const MANN_WHITNEY: &str = "Mann-Whitney U Test";
    pub const WILCOXON: &str = "Wilcoxon Signed-Rank Test";
    pub const KRUSKAL_WALLIS: &str = "Kruskal-Wallis Test";
    pub const FRIEDMAN: &str = "Friedman Test";
    pub const CHI_SQUARED: &str = "Chi-Squared Test";
    pub const PEARSON: &str = "Pearson Correlation";
    pub const SPEARMAN: &str = "Spearman's Rank Correlation";
    pub const KENDALL: &str = "Kendall's Rank Correlation";
    pub const ADF: &str = "Augmented Dickey-Fuller Test";
    pub const KPSS: &str = "Kwiatkowski-Phillips-Schmidt-Shin (KPSS) Test";
    pub const LINEAR_REGRESSION: &str = "Linear Regression";
    pub const MULTIPLE_LINEAR_REGRESSION: &str = "Multiple Linear Regression";
    pub const LOGISTIC_REGRESSION: &str = "Logistic Regression";
}

/// One row of a static catalog; `provider: None` marks a declared but unimplemented test
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub identifier: &'static str,
    pub shape: ShapeDescriptor,
    pub schema: ResultSchema,
    pub groups: &'static [CatalogGroup],
    pub provider: Option<ProviderFn>,
}

use CatalogGroup::{AbTests, CorrelationTests, HypothesisTests, RegressionTests, StationaryTests};

const SAMPLES: ShapeDescriptor = ShapeDescriptor::pair("Sample 1", "Sample 2");
const TWO_GROUPS: ShapeDescriptor = ShapeDescriptor::pair("Group 1", "Group 2");
const BEFORE_AFTER: ShapeDescriptor = ShapeDescriptor::paired("Before", "After");
const XY: ShapeDescriptor = ShapeDescriptor::paired("X", "Y");
const CONTINGENCY: ShapeDescriptor = ShapeDescriptor::Matrix {
    label: "Contingency Table",
};
const REGRESSION_DATA: ShapeDescriptor = ShapeDescriptor::PredictorResponse {
    predictors: "Predictors",
    response: "Response",
};

const ADF_SCHEMA: ResultSchema = ResultSchema::Stationarity {
    statistic_key: fields::ADF_STATISTIC,
};
const KPSS_SCHEMA: ResultSchema = ResultSchema::Stationarity {
    statistic_key: fields::KPSS_STATISTIC,
};

const fn entry(
    identifier: &'static str,
    shape: ShapeDescriptor,
    schema: ResultSchema,
    groups: &'static [CatalogGroup],
    provider: ProviderFn,
) -> CatalogEntry {
    CatalogEntry {
        identifier,
        shape,
        schema,
        groups,
        provider: Some(provider),
    }
}

const fn declared(
    identifier: &'static str,
    shape: ShapeDescriptor,
    schema: ResultSchema,
    groups: &'static [CatalogGroup],
) -> CatalogEntry {
    CatalogEntry {
        identifier,
        shape,
        schema,
        groups,
        provider: None,
    }
}

/// Every test the engine knows about out of the box
pub const STANDARD_CATALOG: &[CatalogEntry] = &[
    entry(
        names::SHAPIRO_WILK,
        ShapeDescriptor::SingleSequence,
        ResultSchema::Hypothesis,
        &[HypothesisTests],
        bindings::shapiro_wilk,
    ),
    entry(
        names::DAGOSTINO_K2,
        ShapeDescriptor::SingleSequence,
        ResultSchema::Hypothesis,
        &[HypothesisTests],
        bindings::dagostino_k2,
    ),
    entry(
        names::ANDERSON_DARLING,
        ShapeDescriptor::SingleSequence,
        ResultSchema::DistributionFit,
        &[HypothesisTests],
        bindings::anderson_darling,
    ),
    entry(
        names::KOLMOGOROV_SMIRNOV,
        SAMPLES,
        ResultSchema::Hypothesis,
        &[HypothesisTests],
        bindings::kolmogorov_smirnov,
    ),
    entry(
        names::STUDENT_T,
        TWO_GROUPS,
        ResultSchema::Hypothesis,
        &[HypothesisTests, AbTests],
        bindings::student_t,
    ),
    entry(
        names::PAIRED_T,
        BEFORE_AFTER,
        ResultSchema::Hypothesis,
        &[HypothesisTests, AbTests],
        bindings::paired_t,
    ),
    entry(
        names::ANOVA,
        ShapeDescriptor::groups(2),
        ResultSchema::Hypothesis,
        &[],
        bindings::one_way_anova,
    ),
    entry(
        names::ONE_WAY_ANOVA,
        ShapeDescriptor::groups(2),
        ResultSchema::Hypothesis,
        &[HypothesisTests],
        bindings::one_way_anova,
    ),
    declared(
        names::TWO_WAY_ANOVA,
        ShapeDescriptor::groups(2),
        ResultSchema::Hypothesis,
        &[HypothesisTests],
    ),
    declared(
        names::REPEATED_MEASURES_ANOVA,
        ShapeDescriptor::groups(2),
        ResultSchema::Hypothesis,
        &[HypothesisTests],
    ),
    entry(
        names::MANN_WHITNEY,
        SAMPLES,
        ResultSchema::Hypothesis,
        &[HypothesisTests],
        bindings::mann_whitney_u,
    ),
    entry(
        names::WILCOXON,
        BEFORE_AFTER,
        ResultSchema::Hypothesis,
        &[HypothesisTests],
        bindings::wilcoxon_signed_rank,
    ),
    entry(
        names::KRUSKAL_WALLIS,
        ShapeDescriptor::groups(2),
        ResultSchema::Hypothesis,
        &[HypothesisTests],
        bindings::kruskal_wallis,
    ),
    entry(
        names::FRIEDMAN,
        ShapeDescriptor::groups(3),
        ResultSchema::Hypothesis,
        &[HypothesisTests],
        bindings::friedman,
    ),
    entry(
        names::CHI_SQUARED,
        CONTINGENCY,
        ResultSchema::Hypothesis,
        &[AbTests],
        bindings::chi_squared,
    ),
    entry(
        names::PEARSON,
        XY,
        ResultSchema::Correlation,
        &[CorrelationTests],
        bindings::pearson,
    ),
    entry(
        names::SPEARMAN,
        XY,
        ResultSchema::Correlation,
        &[CorrelationTests],
        bindings::spearman,
    ),
    entry(
        names::KENDALL,
        XY,
        ResultSchema::Correlation,
        &[CorrelationTests],
        bindings::kendall_tau,
    ),
    entry(
        names::ADF,
        ShapeDescriptor::SingleSequence,
        ADF_SCHEMA,
        &[StationaryTests],
        bindings::augmented_dickey_fuller,
    ),
    entry(
        names::KPSS,
        ShapeDescriptor::SingleSequence,
        KPSS_SCHEMA,
        &[StationaryTests],
        bindings::kpss,
    ),
    entry(
        names::LINEAR_REGRESSION,
        REGRESSION_DATA,
        ResultSchema::Regression { r_squared: true },
        &[RegressionTests],
        bindings::linear_regression,
    ),
    entry(
        names::MULTIPLE_LINEAR_REGRESSION,
        REGRESSION_DATA,
        ResultSchema::Regression { r_squared: true },
        &[RegressionTests],
        bindings::linear_regression,
    ),
    entry(
        names::LOGISTIC_REGRESSION,
        REGRESSION_DATA,
        ResultSchema::Regression { r_squared: false },
        &[RegressionTests],
        bindings::logistic_regression,
    ),
];
