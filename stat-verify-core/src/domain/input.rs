use serde::Serialize;

/// A labelled numeric sample, e.g. `"Before" => [1.5, 2.0]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSample {
    pub label: String,
    pub values: Vec<f64>,
}

impl NamedSample {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Normalized copy of a raw input in the canonical form for its shape.
///
/// Only produced after shape validation; every sequence is non-empty and every
/// table is rectangular.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "data", rename_all = "snake_case")]
pub enum ValidatedInput {
    Sequence(Vec<f64>),
    Pair(NamedSample, NamedSample),
    Groups(Vec<NamedSample>),
    Matrix(Vec<Vec<f64>>),
    PredictorResponse {
        predictors: Vec<Vec<f64>>,
        response: Vec<f64>,
    },
}

impl ValidatedInput {
    pub fn sequence(&self) -> Option<&[f64]> {
        match self {
            Self::Sequence(values) => Some(values),
            _ => None,
        }
    }

    pub fn pair(&self) -> Option<(&[f64], &[f64])> {
        match self {
            Self::Pair(first, second) => Some((&first.values, &second.values)),
            _ => None,
        }
    }

    pub fn groups(&self) -> Option<Vec<&[f64]>> {
        match self {
            Self::Groups(groups) => Some(groups.iter().map(|g| g.values.as_slice()).collect()),
            _ => None,
        }
    }

    pub fn matrix(&self) -> Option<&[Vec<f64>]> {
        match self {
            Self::Matrix(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn predictor_response(&self) -> Option<(&[Vec<f64>], &[f64])> {
        match self {
            Self::PredictorResponse {
                predictors,
                response,
            } => Some((predictors, response)),
            _ => None,
        }
    }

    /// Total number of numeric cells held by this input
    pub fn cell_count(&self) -> usize {
        match self {
            Self::Sequence(values) => values.len(),
            Self::Pair(first, second) => first.len() + second.len(),
            Self::Groups(groups) => groups.iter().map(NamedSample::len).sum(),
            Self::Matrix(rows) => rows.iter().map(Vec::len).sum(),
            Self::PredictorResponse {
                predictors,
                response,
            } => predictors.iter().map(Vec::len).sum::<usize>() + response.len(),
        }
    }
}
