use thiserror::Error;

use crate::domain::ids::TestIdentifier;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Structural problems with a raw input, detected before any computation runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("could not parse '{token}' in '{field}' as a finite number")]
    Parse { field: String, token: String },

    #[error("row {row} of '{field}' has {found} columns, expected {expected}")]
    RaggedRow {
        field: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("predictors have {predictors} rows but the response has {response} values")]
    RowCountMismatch { predictors: usize, response: usize },

    #[error("'{first}' has {first_len} values but '{second}' has {second_len}; paired samples need equal lengths")]
    LengthMismatch {
        first: String,
        first_len: usize,
        second: String,
        second_len: usize,
    },

    #[error("'{field}' is empty")]
    Empty { field: String },

    #[error("missing field '{field}'")]
    MissingField { field: String },

    #[error("unexpected field '{field}'")]
    UnexpectedField { field: String },

    #[error("at least {required} groups are required, got {found}")]
    TooFewGroups { required: usize, found: usize },

    #[error("'{field}' must be {expected}, got {found}")]
    Structure {
        field: String,
        expected: String,
        found: String,
    },
}

impl ShapeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse_error",
            Self::RaggedRow { .. } => "ragged_row",
            Self::RowCountMismatch { .. } => "row_count_mismatch",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::Empty { .. } => "empty_input",
            Self::MissingField { .. } => "missing_field",
            Self::UnexpectedField { .. } => "unexpected_field",
            Self::TooFewGroups { .. } => "too_few_groups",
            Self::Structure { .. } => "structure_error",
        }
    }
}

/// Failure of one `execute` call; always names the test it concerns
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("unknown test '{0}'")]
    UnknownTest(TestIdentifier),

    #[error("invalid input for '{test}': {source}")]
    InvalidInput {
        test: TestIdentifier,
        #[source]
        source: ShapeError,
    },

    #[error("'{test}' failed: {message}")]
    Computation {
        test: TestIdentifier,
        message: String,
    },

    #[error("'{0}' is cataloged but not implemented")]
    NotImplemented(TestIdentifier),
}

impl ExecutionError {
    pub fn test(&self) -> &TestIdentifier {
        match self {
            Self::UnknownTest(test)
            | Self::InvalidInput { test, .. }
            | Self::Computation { test, .. }
            | Self::NotImplemented(test) => test,
        }
    }

    /// Stable snake_case name of the error kind, for machine-readable reports
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownTest(_) => "unknown_test",
            Self::InvalidInput { source, .. } => source.code(),
            Self::Computation { .. } => "computation_error",
            Self::NotImplemented(_) => "not_implemented",
        }
    }

    pub fn shape_error(&self) -> Option<&ShapeError> {
        match self {
            Self::InvalidInput { source, .. } => Some(source),
            _ => None,
        }
    }
}
