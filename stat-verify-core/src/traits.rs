use crate::domain::input::ValidatedInput;
use crate::domain::result::ComputedResult;

/// Pure numeric routine bound to one test identifier.
///
/// Receives an input that already matches the test's shape and returns the
/// normalized result; any error is reported by the engine as a computation
/// failure of that test.
pub trait ComputationProvider: Send + Sync {
    fn compute(&self, input: &ValidatedInput) -> anyhow::Result<ComputedResult>;
}

impl<F> ComputationProvider for F
where
    F: Fn(&ValidatedInput) -> anyhow::Result<ComputedResult> + Send + Sync,
{
    fn compute(&self, input: &ValidatedInput) -> anyhow::Result<ComputedResult> {
        self(input)
    }
}
