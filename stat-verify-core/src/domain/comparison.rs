use serde::{Deserialize, Serialize};
use std::fmt;

use super::result::ResultValue;
use crate::error::{CoreError, Result};

/// Precision used by the reference fixtures (values rounded to 6 decimals)
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-6;

/// Maximum allowed difference for two numbers to be considered equal
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AbsoluteTolerance(f64);

impl AbsoluteTolerance {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::Validation(format!(
                "absolute tolerance must be a finite, non-negative number, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `|a - b| <= tolerance`; identical values (including equal infinities) always match
    pub fn accepts(self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.0
    }
}

impl Default for AbsoluteTolerance {
    fn default() -> Self {
        Self(DEFAULT_ABSOLUTE_TOLERANCE)
    }
}

impl TryFrom<f64> for AbsoluteTolerance {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AbsoluteTolerance> for f64 {
    fn from(tolerance: AbsoluteTolerance) -> Self {
        tolerance.0
    }
}

impl fmt::Display for AbsoluteTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:e}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Present in the expected result, absent from the actual one
    Missing,
    /// Both numeric, difference larger than the tolerance
    OutOfTolerance,
    /// Both sequences, different lengths
    LengthMismatch,
    /// Different value kinds, e.g. number against sequence
    TypeMismatch,
    /// Non-numeric leaves that are not exactly equal
    ValueMismatch,
}

/// One field that failed comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMismatch {
    /// Dotted path with list indices, e.g. `critical_values.5%` or `coefficients[1]`
    pub path: String,
    pub kind: MismatchKind,
    pub expected: ResultValue,
    /// `None` when the field is missing from the actual result
    pub actual: Option<ResultValue>,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actual {
            Some(actual) => write!(
                f,
                "{}: expected {}, got {}",
                self.path, self.expected, actual
            ),
            None => write!(f, "{}: expected {}, got missing", self.path, self.expected),
        }
    }
}

/// Result of comparing a computed result against a reference result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonOutcome {
    pub passed: bool,
    pub mismatches: Vec<FieldMismatch>,
}

impl ComparisonOutcome {
    pub fn from_mismatches(mismatches: Vec<FieldMismatch>) -> Self {
        Self {
            passed: mismatches.is_empty(),
            mismatches,
        }
    }

    pub fn mismatched_paths(&self) -> Vec<&str> {
        self.mismatches.iter().map(|m| m.path.as_str()).collect()
    }
}
