use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use super::comparison::{AbsoluteTolerance, DEFAULT_ABSOLUTE_TOLERANCE};
use crate::error::{CoreError, Result};

pub const DEFAULT_TOKEN_DELIMITER: char = ',';
pub const DEFAULT_ROW_DELIMITER: char = '\n';
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Immutable configuration of the verification engine, loaded once at start-up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(default)]
pub struct VerificationSettings {
    /// Numeric tolerance used when comparing against reference results
    #[validate(range(min = 0.0, max = 1.0))]
    pub absolute_tolerance: f64,
    /// Separator between numeric tokens in text input
    pub token_delimiter: char,
    /// Separator between table rows in text input
    pub row_delimiter: char,
    /// Upper bound on concurrently running fixture verifications
    #[validate(range(min = 1, max = 256))]
    pub max_concurrency: usize,
    /// Replaces the embedded fixture table when set
    pub fixtures_path: Option<PathBuf>,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            token_delimiter: DEFAULT_TOKEN_DELIMITER,
            row_delimiter: DEFAULT_ROW_DELIMITER,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            fixtures_path: None,
        }
    }
}

impl VerificationSettings {
    /// Check ranges and delimiters, returning the settings unchanged when valid
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Self::check_delimiter("token_delimiter", self.token_delimiter)?;
        Self::check_delimiter("row_delimiter", self.row_delimiter)?;
        if self.token_delimiter == self.row_delimiter {
            return Err(CoreError::Configuration(
                "token_delimiter and row_delimiter must differ".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn tolerance(&self) -> Result<AbsoluteTolerance> {
        AbsoluteTolerance::new(self.absolute_tolerance)
    }

    // A delimiter that can appear inside a number would split tokens like "1e-3".
    fn check_delimiter(name: &str, delimiter: char) -> Result<()> {
        if delimiter.is_ascii_alphanumeric() || matches!(delimiter, '.' | '-' | '+') {
            return Err(CoreError::Configuration(format!(
                "{} '{}' can occur inside a number",
                name,
                delimiter.escape_default()
            )));
        }
        Ok(())
    }
}
