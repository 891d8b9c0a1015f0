use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("{procedure} requires at least {required} observations, got {found}")]
    InsufficientData {
        procedure: &'static str,
        required: usize,
        found: usize,
    },

    #[error("{procedure} is undefined for this input: {reason}")]
    Degenerate {
        procedure: &'static str,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("{procedure} did not converge after {iterations} iterations")]
    NonConvergence {
        procedure: &'static str,
        iterations: usize,
    },
}

pub type Result<T> = std::result::Result<T, StatsError>;

impl StatsError {
    pub(crate) fn degenerate(procedure: &'static str, reason: impl Into<String>) -> Self {
        Self::Degenerate {
            procedure,
            reason: reason.into(),
        }
    }
}

pub(crate) fn require_len(procedure: &'static str, data: &[f64], required: usize) -> Result<()> {
    if data.len() < required {
        return Err(StatsError::InsufficientData {
            procedure,
            required,
            found: data.len(),
        });
    }
    Ok(())
}

pub(crate) fn require_finite(data: &[f64]) -> Result<()> {
    if data.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::InvalidArgument(
            "input contains NaN or infinite values".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn require_same_len(first: &[f64], second: &[f64]) -> Result<()> {
    if first.len() != second.len() {
        return Err(StatsError::InvalidArgument(format!(
            "samples must have equal lengths, got {} and {}",
            first.len(),
            second.len()
        )));
    }
    Ok(())
}
