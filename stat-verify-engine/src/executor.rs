use serde_json::Value;
use stat_verify_core::{
    AbsoluteTolerance, ComparisonOutcome, ComputedResult, CoreError, ExecutionError,
    ExpectedResult, ValidatedInput, VerificationSettings,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::comparator;
use crate::registry::{RegistryEntry, TestRegistry};
use crate::validator::InputValidator;

/// Looks up, validates, dispatches and checks a single test execution.
///
/// Cloning is cheap: the registry is shared behind an `Arc` and never mutated,
/// so one engine can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct TestEngine {
    registry: Arc<TestRegistry>,
    validator: InputValidator,
    tolerance: AbsoluteTolerance,
}

impl TestEngine {
    pub fn new(registry: TestRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            validator: InputValidator::default(),
            tolerance: AbsoluteTolerance::default(),
        }
    }

    /// Engine over the standard catalog with default settings
    pub fn standard() -> Self {
        Self::new(TestRegistry::standard())
    }

    pub fn with_settings(
        registry: TestRegistry,
        settings: &VerificationSettings,
    ) -> Result<Self, CoreError> {
        let settings = settings.clone().validated()?;
        Ok(Self {
            registry: Arc::new(registry),
            validator: InputValidator::from_settings(&settings),
            tolerance: settings.tolerance()?,
        })
    }

    pub fn with_tolerance(mut self, tolerance: AbsoluteTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn registry(&self) -> &TestRegistry {
        &self.registry
    }

    pub fn tolerance(&self) -> AbsoluteTolerance {
        self.tolerance
    }

    /// Shape check only, without running the provider
    pub fn validate(&self, identifier: &str, raw: &Value) -> Result<ValidatedInput, ExecutionError> {
        let entry = self.registry.lookup(identifier)?;
        self.validate_entry(entry, raw)
    }

    /// Run the test named `identifier` on `raw` and return its normalized result.
    ///
    /// The order of checks is fixed: unknown identifier, missing provider, input
    /// shape, provider failure, then missing result fields. A provider is never
    /// called with input that failed validation.
    pub fn execute(&self, identifier: &str, raw: &Value) -> Result<ComputedResult, ExecutionError> {
        let entry = self.registry.lookup(identifier).map_err(|err| {
            tracing::warn!("{}", err);
            err
        })?;
        let provider = entry
            .provider
            .as_ref()
            .ok_or_else(|| ExecutionError::NotImplemented(entry.identifier.clone()))?;
        let input = self.validate_entry(entry, raw)?;

        tracing::debug!(
            "Dispatching {} ({} input, {} values)",
            entry.identifier,
            entry.shape.kind(),
            input.cell_count()
        );

        let result = match panic::catch_unwind(AssertUnwindSafe(|| provider.compute(&input))) {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => return Err(computation_failed(entry, format!("{:#}", err))),
            Err(payload) => return Err(computation_failed(entry, panic_message(payload.as_ref()))),
        };

        if let Some(field) = entry
            .schema
            .required_fields()
            .into_iter()
            .find(|field| !result.contains(field))
        {
            return Err(computation_failed(
                entry,
                format!(
                    "result is missing required {} field '{}'",
                    entry.schema.name(),
                    field
                ),
            ));
        }

        tracing::debug!("Completed {} with {} fields", entry.identifier, result.len());
        Ok(result)
    }

    /// Compare under the engine's tolerance; the identifier must be registered
    pub fn compare(
        &self,
        identifier: &str,
        computed: &ComputedResult,
        expected: &ExpectedResult,
    ) -> Result<ComparisonOutcome, ExecutionError> {
        self.compare_with(identifier, computed, expected, self.tolerance)
    }

    pub fn compare_with(
        &self,
        identifier: &str,
        computed: &ComputedResult,
        expected: &ExpectedResult,
        tolerance: AbsoluteTolerance,
    ) -> Result<ComparisonOutcome, ExecutionError> {
        self.registry.lookup(identifier)?;
        Ok(comparator::compare(expected, computed, tolerance))
    }

    fn validate_entry(
        &self,
        entry: &RegistryEntry,
        raw: &Value,
    ) -> Result<ValidatedInput, ExecutionError> {
        self.validator.validate(&entry.shape, raw).map_err(|source| {
            tracing::warn!("Rejected input for {}: {}", entry.identifier, source);
            ExecutionError::InvalidInput {
                test: entry.identifier.clone(),
                source,
            }
        })
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn computation_failed(entry: &RegistryEntry, message: String) -> ExecutionError {
    tracing::warn!("{} failed: {}", entry.identifier, message);
    ExecutionError::Computation {
        test: entry.identifier.clone(),
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("provider panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("provider panicked: {}", message)
    } else {
        "provider panicked".to_string()
    }
}
