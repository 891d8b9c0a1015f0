//! Provider functions bound into the standard catalog.
//!
//! Each binding unpacks the validated input for its shape, calls the numeric
//! routine and normalizes the native output.

use anyhow::{anyhow, Result};
use stat_verify_core::{ComputedResult, ValidatedInput};
use stat_verify_providers as stats;

use crate::normalize::Normalize;

/// Plain function pointer form of a computation provider, usable in const tables
pub type ProviderFn = fn(&ValidatedInput) -> Result<ComputedResult>;

fn sequence(input: &ValidatedInput) -> Result<&[f64]> {
    input
        .sequence()
        .ok_or_else(|| anyhow!("expected a single sequence, got {}", shape_name(input)))
}

fn pair(input: &ValidatedInput) -> Result<(&[f64], &[f64])> {
    input
        .pair()
        .ok_or_else(|| anyhow!("expected two named samples, got {}", shape_name(input)))
}

fn groups(input: &ValidatedInput) -> Result<Vec<&[f64]>> {
    input
        .groups()
        .ok_or_else(|| anyhow!("expected named groups, got {}", shape_name(input)))
}

fn matrix(input: &ValidatedInput) -> Result<&[Vec<f64>]> {
    input
        .matrix()
        .ok_or_else(|| anyhow!("expected a table, got {}", shape_name(input)))
}

fn predictor_response(input: &ValidatedInput) -> Result<(&[Vec<f64>], &[f64])> {
    input
        .predictor_response()
        .ok_or_else(|| anyhow!("expected predictors and response, got {}", shape_name(input)))
}

fn shape_name(input: &ValidatedInput) -> &'static str {
    match input {
        ValidatedInput::Sequence(_) => "a single sequence",
        ValidatedInput::Pair(..) => "two named samples",
        ValidatedInput::Groups(_) => "named groups",
        ValidatedInput::Matrix(_) => "a table",
        ValidatedInput::PredictorResponse { .. } => "predictors and response",
    }
}

pub fn shapiro_wilk(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::shapiro_wilk(sequence(input)?)?.normalize())
}

pub fn dagostino_k2(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::dagostino_k2(sequence(input)?)?.normalize())
}

pub fn anderson_darling(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::anderson_darling(sequence(input)?)?.normalize())
}

pub fn kolmogorov_smirnov(input: &ValidatedInput) -> Result<ComputedResult> {
    let (first, second) = pair(input)?;
    Ok(stats::kolmogorov_smirnov_2samp(first, second)?.normalize())
}

pub fn student_t(input: &ValidatedInput) -> Result<ComputedResult> {
    let (first, second) = pair(input)?;
    Ok(stats::student_t(first, second)?.normalize())
}

pub fn paired_t(input: &ValidatedInput) -> Result<ComputedResult> {
    let (before, after) = pair(input)?;
    Ok(stats::paired_t(before, after)?.normalize())
}

pub fn one_way_anova(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::one_way_anova(&groups(input)?)?.normalize())
}

pub fn mann_whitney_u(input: &ValidatedInput) -> Result<ComputedResult> {
    let (first, second) = pair(input)?;
    Ok(stats::mann_whitney_u(first, second)?.normalize())
}

pub fn wilcoxon_signed_rank(input: &ValidatedInput) -> Result<ComputedResult> {
    let (before, after) = pair(input)?;
    Ok(stats::wilcoxon_signed_rank(before, after)?.normalize())
}

pub fn kruskal_wallis(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::kruskal_wallis(&groups(input)?)?.normalize())
}

pub fn friedman(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::friedman(&groups(input)?)?.normalize())
}

pub fn chi_squared(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::chi_squared_contingency(matrix(input)?)?.normalize())
}

pub fn pearson(input: &ValidatedInput) -> Result<ComputedResult> {
    let (x, y) = pair(input)?;
    Ok(stats::pearson(x, y)?.normalize())
}

pub fn spearman(input: &ValidatedInput) -> Result<ComputedResult> {
    let (x, y) = pair(input)?;
    Ok(stats::spearman(x, y)?.normalize())
}

pub fn kendall_tau(input: &ValidatedInput) -> Result<ComputedResult> {
    let (x, y) = pair(input)?;
    Ok(stats::kendall_tau(x, y)?.normalize())
}

pub fn augmented_dickey_fuller(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::augmented_dickey_fuller(sequence(input)?)?.normalize())
}

pub fn kpss(input: &ValidatedInput) -> Result<ComputedResult> {
    Ok(stats::kpss(sequence(input)?)?.normalize())
}

pub fn linear_regression(input: &ValidatedInput) -> Result<ComputedResult> {
    let (predictors, response) = predictor_response(input)?;
    Ok(stats::linear_regression(predictors, response)?.normalize())
}

pub fn logistic_regression(input: &ValidatedInput) -> Result<ComputedResult> {
    let (predictors, response) = predictor_response(input)?;
    Ok(stats::logistic_regression(predictors, response)?.normalize())
}
