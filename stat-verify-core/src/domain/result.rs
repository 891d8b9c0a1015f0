use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One field of a result: a scalar, a label, a list, or a nested mapping
/// (e.g. critical values keyed by significance level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
    Sequence(Vec<ResultValue>),
    Mapping(BTreeMap<String, ResultValue>),
}

impl ResultValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ResultValue]> {
        match self {
            Self::Sequence(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, ResultValue>> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Flat numeric view of a sequence of numbers
    pub fn to_numbers(&self) -> Option<Vec<f64>> {
        self.as_sequence()?
            .iter()
            .map(ResultValue::as_number)
            .collect()
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for ResultValue {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for ResultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ResultValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<f64>> for ResultValue {
    fn from(values: Vec<f64>) -> Self {
        Self::Sequence(values.into_iter().map(Self::Number).collect())
    }
}

impl From<Vec<Vec<f64>>> for ResultValue {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self::Sequence(rows.into_iter().map(Self::from).collect())
    }
}

impl From<Vec<ResultValue>> for ResultValue {
    fn from(values: Vec<ResultValue>) -> Self {
        Self::Sequence(values)
    }
}

impl From<BTreeMap<String, ResultValue>> for ResultValue {
    fn from(entries: BTreeMap<String, ResultValue>) -> Self {
        Self::Mapping(entries)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ResultValue {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self::Mapping(
            iter.into_iter()
                .map(|(key, value)| (key.into(), Self::Number(value)))
                .collect(),
        )
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "\"{}\"", value),
            Self::Sequence(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Self::Mapping(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Structured output of one test execution, keyed by result-field name.
///
/// Built once by the engine and handed to the caller; there is no API for
/// mutating a result after construction apart from consuming builders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComputedResult {
    fields: BTreeMap<String, ResultValue>,
}

/// Reference data a computed result is verified against.
pub type ExpectedResult = ComputedResult;

impl ComputedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<ResultValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ResultValue> {
        self.fields.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ResultValue::as_number)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &ResultValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<ResultValue>> FromIterator<(K, V)> for ComputedResult {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
