use serde::{Deserialize, Serialize};
use serde_json::Value;
use stat_verify_core::{CoreError, ExpectedResult, Result, TestIdentifier, VerificationSettings};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const EMBEDDED_FIXTURES: &str = include_str!("../fixtures/verification.json");

/// Reference input and expected output for one test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// Raw input in the shape the test declares
    pub data: Value,
    pub expected_result: ExpectedResult,
}

/// Verification fixtures keyed by test identifier.
///
/// Loaded once and treated as immutable reference data; the JSON form is a
/// plain object `{ "<identifier>": { "data": .., "expected_result": .. } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureTable {
    fixtures: BTreeMap<TestIdentifier, Fixture>,
}

impl FixtureTable {
    /// Fixtures compiled into the crate.
    ///
    /// The Logistic Regression entry holds the converged L2-penalised (C = 1)
    /// solution, coefficients `[[0.701613]]` and intercept `[-0.655671]`. It
    /// replaces the older `[[0.701610]]` / `[-0.655680]` pair, which came from a
    /// solver stopped short of convergence and sits outside the default 1e-6
    /// tolerance of the exact optimum.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_FIXTURES)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| CoreError::Io(format!("{}: {}", path.display(), e)))?;
        let table: Self = serde_json::from_str(&json)
            .map_err(|e| CoreError::Serialization(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Loaded {} fixtures from {}", table.len(), path.display());
        Ok(table)
    }

    /// `fixtures_path` when configured, otherwise the embedded table
    pub fn load(settings: &VerificationSettings) -> Result<Self> {
        match &settings.fixtures_path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Fixture> {
        self.fixtures.get(identifier)
    }

    /// Fixtures in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&TestIdentifier, &Fixture)> {
        self.fixtures.iter()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &TestIdentifier> {
        self.fixtures.keys()
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Table restricted to `identifiers`; each must have a fixture
    pub fn subset<S: AsRef<str>>(&self, identifiers: &[S]) -> Result<Self> {
        let mut fixtures = BTreeMap::new();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            let fixture = self.get(identifier).ok_or_else(|| {
                CoreError::NotFound(format!("no fixture for '{}'", identifier))
            })?;
            fixtures.insert(TestIdentifier::new(identifier), fixture.clone());
        }
        Ok(Self { fixtures })
    }

    pub fn insert(mut self, identifier: impl Into<TestIdentifier>, fixture: Fixture) -> Self {
        self.fixtures.insert(identifier.into(), fixture);
        self
    }
}
