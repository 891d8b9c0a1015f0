use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Newtype for the unique name of a statistical procedure, e.g. "Shapiro-Wilk Test"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TestIdentifier(String);

impl TestIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TestIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TestIdentifier {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TestIdentifier {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<TestIdentifier> for String {
    fn from(id: TestIdentifier) -> Self {
        id.0
    }
}

impl AsRef<str> for TestIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Allows `HashMap<TestIdentifier, _>::get(&str)`.
impl Borrow<str> for TestIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}
