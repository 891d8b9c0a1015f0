use serde::Serialize;
use std::fmt;

/// Structural contract an input must satisfy before a test can run.
///
/// Labels are the mapping keys the raw input is expected to carry, e.g.
/// `"Group 1"` / `"Group 2"` for an independent two-sample test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDescriptor {
    /// One list of numbers.
    SingleSequence,
    /// Two labelled lists. `paired` requires equal lengths.
    NamedPair {
        first: &'static str,
        second: &'static str,
        paired: bool,
    },
    /// Mapping from group label to numeric list, at least `min_groups` entries.
    NamedGroups { min_groups: usize },
    /// Rectangular numeric table, optionally wrapped in a mapping under `label`.
    Matrix { label: &'static str },
    /// 2-D predictor matrix plus a response vector with one value per row.
    PredictorResponse {
        predictors: &'static str,
        response: &'static str,
    },
}

impl ShapeDescriptor {
    pub const fn pair(first: &'static str, second: &'static str) -> Self {
        Self::NamedPair {
            first,
            second,
            paired: false,
        }
    }

    pub const fn paired(first: &'static str, second: &'static str) -> Self {
        Self::NamedPair {
            first,
            second,
            paired: true,
        }
    }

    pub const fn groups(min_groups: usize) -> Self {
        Self::NamedGroups { min_groups }
    }

    /// Short machine-friendly name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SingleSequence => "single_sequence",
            Self::NamedPair { .. } => "named_pair",
            Self::NamedGroups { .. } => "named_groups",
            Self::Matrix { .. } => "matrix",
            Self::PredictorResponse { .. } => "predictor_response",
        }
    }
}

impl fmt::Display for ShapeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleSequence => write!(f, "one numeric sequence"),
            Self::NamedPair {
                first,
                second,
                paired: true,
            } => write!(f, "paired sequences '{}' and '{}'", first, second),
            Self::NamedPair { first, second, .. } => {
                write!(f, "named sequences '{}' and '{}'", first, second)
            }
            Self::NamedGroups { min_groups } => {
                write!(f, "{} or more named groups", min_groups)
            }
            Self::Matrix { label } => write!(f, "rectangular table '{}'", label),
            Self::PredictorResponse {
                predictors,
                response,
            } => write!(f, "matrix '{}' with vector '{}'", predictors, response),
        }
    }
}
