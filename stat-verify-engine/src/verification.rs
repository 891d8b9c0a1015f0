use serde::Serialize;
use stat_verify_core::{ComputedResult, FieldMismatch, TestIdentifier};

use crate::comparator;
use crate::executor::TestEngine;
use crate::fixtures::Fixture;

/// Outcome of checking one fixture
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationStatus {
    Passed,
    Failed { mismatches: Vec<FieldMismatch> },
    /// Execution itself failed; `code` is the error kind
    Errored { code: String, message: String },
}

impl VerificationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed { .. } => "failed",
            Self::Errored { .. } => "errored",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub test: TestIdentifier,
    #[serde(flatten)]
    pub status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed: Option<ComputedResult>,
}

impl VerificationReport {
    pub fn errored(
        test: impl Into<TestIdentifier>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            test: test.into(),
            status: VerificationStatus::Errored {
                code: code.into(),
                message: message.into(),
            },
            computed: None,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self.status, VerificationStatus::Passed)
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }
}

/// Execute the fixture's input and compare the result with its expected output
pub fn verify_fixture(engine: &TestEngine, identifier: &str, fixture: &Fixture) -> VerificationReport {
    let computed = match engine.execute(identifier, &fixture.data) {
        Ok(computed) => computed,
        Err(err) => return VerificationReport::errored(identifier, err.code(), err.to_string()),
    };

    let outcome = comparator::compare(&fixture.expected_result, &computed, engine.tolerance());
    let status = if outcome.passed {
        tracing::debug!("Verified {}", identifier);
        VerificationStatus::Passed
    } else {
        tracing::warn!(
            "{} differs from its fixture at {}",
            identifier,
            outcome.mismatched_paths().join(", ")
        );
        VerificationStatus::Failed {
            mismatches: outcome.mismatches,
        }
    };

    VerificationReport {
        test: TestIdentifier::new(identifier),
        status,
        computed: Some(computed),
    }
}
