use serde_json::{Map, Value};
use stat_verify_core::{
    NamedSample, ShapeDescriptor, ShapeError, ValidatedInput, VerificationSettings,
    DEFAULT_ROW_DELIMITER, DEFAULT_TOKEN_DELIMITER,
};

/// Field name used in errors about an input that is not keyed by label
pub const DATA_FIELD: &str = "data";

type Result<T> = std::result::Result<T, ShapeError>;

/// Checks raw JSON input against a shape descriptor and produces its canonical form.
///
/// Numeric sequences may be JSON arrays of numbers, arrays of numeric strings,
/// or a single delimited string; tables may also be given as text, one row per
/// line. Validation is pure: the raw value is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputValidator {
    token_delimiter: char,
    row_delimiter: char,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_DELIMITER, DEFAULT_ROW_DELIMITER)
    }
}

impl InputValidator {
    pub fn new(token_delimiter: char, row_delimiter: char) -> Self {
        Self {
            token_delimiter,
            row_delimiter,
        }
    }

    pub fn from_settings(settings: &VerificationSettings) -> Self {
        Self::new(settings.token_delimiter, settings.row_delimiter)
    }

    pub fn validate(&self, shape: &ShapeDescriptor, raw: &Value) -> Result<ValidatedInput> {
        match *shape {
            ShapeDescriptor::SingleSequence => {
                Ok(ValidatedInput::Sequence(self.sequence(DATA_FIELD, raw)?))
            }
            ShapeDescriptor::NamedPair {
                first,
                second,
                paired,
            } => self.named_pair(raw, first, second, paired),
            ShapeDescriptor::NamedGroups { min_groups } => self.named_groups(raw, min_groups),
            ShapeDescriptor::Matrix { label } => self.matrix(raw, label),
            ShapeDescriptor::PredictorResponse {
                predictors,
                response,
            } => self.predictor_response(raw, predictors, response),
        }
    }

    fn named_pair(
        &self,
        raw: &Value,
        first: &str,
        second: &str,
        paired: bool,
    ) -> Result<ValidatedInput> {
        let object = as_object(raw)?;
        let first_values = self.sequence(first, required(object, first)?)?;
        let second_values = self.sequence(second, required(object, second)?)?;
        reject_unexpected(object, &[first, second])?;

        if paired && first_values.len() != second_values.len() {
            return Err(ShapeError::LengthMismatch {
                first: first.to_string(),
                first_len: first_values.len(),
                second: second.to_string(),
                second_len: second_values.len(),
            });
        }
        Ok(ValidatedInput::Pair(
            NamedSample::new(first, first_values),
            NamedSample::new(second, second_values),
        ))
    }

    fn named_groups(&self, raw: &Value, min_groups: usize) -> Result<ValidatedInput> {
        let object = as_object(raw)?;
        if object.len() < min_groups {
            return Err(ShapeError::TooFewGroups {
                required: min_groups,
                found: object.len(),
            });
        }

        let mut groups = object
            .iter()
            .map(|(label, value)| Ok(NamedSample::new(label.as_str(), self.sequence(label, value)?)))
            .collect::<Result<Vec<_>>>()?;
        groups.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(ValidatedInput::Groups(groups))
    }

    fn matrix(&self, raw: &Value, label: &str) -> Result<ValidatedInput> {
        let table = match raw {
            Value::Object(object) => {
                let table = required(object, label)?;
                reject_unexpected(object, &[label])?;
                table
            }
            other => other,
        };
        Ok(ValidatedInput::Matrix(self.table(label, table)?))
    }

    fn predictor_response(
        &self,
        raw: &Value,
        predictors: &str,
        response: &str,
    ) -> Result<ValidatedInput> {
        let object = as_object(raw)?;
        let rows = self.predictor_table(predictors, required(object, predictors)?)?;
        let targets = self.sequence(response, required(object, response)?)?;
        reject_unexpected(object, &[predictors, response])?;

        if rows.len() != targets.len() {
            return Err(ShapeError::RowCountMismatch {
                predictors: rows.len(),
                response: targets.len(),
            });
        }
        Ok(ValidatedInput::PredictorResponse {
            predictors: rows,
            response: targets,
        })
    }

    /// A flat array of numbers is one predictor column
    fn predictor_table(&self, field: &str, value: &Value) -> Result<Vec<Vec<f64>>> {
        match value {
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_number) => {
                Ok(self.sequence(field, value)?.into_iter().map(|v| vec![v]).collect())
            }
            _ => self.table(field, value),
        }
    }

    /// Non-empty rectangular table
    fn table(&self, field: &str, value: &Value) -> Result<Vec<Vec<f64>>> {
        let rows = match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, row)| match row {
                    Value::Array(_) | Value::String(_) => self.numbers(field, row),
                    other => Err(ShapeError::Structure {
                        field: format!("{}[{}]", field, index),
                        expected: "a row of numbers".to_string(),
                        found: kind(other).to_string(),
                    }),
                })
                .collect::<Result<Vec<_>>>()?,
            Value::String(text) => text
                .split(self.row_delimiter)
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| self.tokens(field, line))
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(ShapeError::Structure {
                    field: field.to_string(),
                    expected: "a table of numbers".to_string(),
                    found: kind(other).to_string(),
                })
            }
        };

        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(ShapeError::Empty {
                field: field.to_string(),
            });
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(ShapeError::RaggedRow {
                field: field.to_string(),
                row,
                expected: width,
                found,
            });
        }
        Ok(rows)
    }

    /// Non-empty numeric sequence
    fn sequence(&self, field: &str, value: &Value) -> Result<Vec<f64>> {
        let values = self.numbers(field, value)?;
        if values.is_empty() {
            return Err(ShapeError::Empty {
                field: field.to_string(),
            });
        }
        Ok(values)
    }

    fn numbers(&self, field: &str, value: &Value) -> Result<Vec<f64>> {
        match value {
            Value::Array(items) => items.iter().map(|item| number(field, item)).collect(),
            Value::String(text) => self.tokens(field, text),
            other => Err(ShapeError::Structure {
                field: field.to_string(),
                expected: "a list of numbers".to_string(),
                found: kind(other).to_string(),
            }),
        }
    }

    /// Split text on either delimiter, skipping blank tokens
    fn tokens(&self, field: &str, text: &str) -> Result<Vec<f64>> {
        text.split(|c| c == self.token_delimiter || c == self.row_delimiter)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| parse_token(field, token))
            .collect()
    }
}

fn parse_token(field: &str, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ShapeError::Parse {
            field: field.to_string(),
            token: token.to_string(),
        })
}

fn number(field: &str, item: &Value) -> Result<f64> {
    match item {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ShapeError::Parse {
                field: field.to_string(),
                token: n.to_string(),
            }),
        Value::String(text) => parse_token(field, text.trim()),
        Value::Array(_) | Value::Object(_) => Err(ShapeError::Structure {
            field: field.to_string(),
            expected: "a number".to_string(),
            found: kind(item).to_string(),
        }),
        other => Err(ShapeError::Parse {
            field: field.to_string(),
            token: other.to_string(),
        }),
    }
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>> {
    raw.as_object().ok_or_else(|| ShapeError::Structure {
        field: DATA_FIELD.to_string(),
        expected: "a mapping from label to values".to_string(),
        found: kind(raw).to_string(),
    })
}

fn required<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    object.get(name).ok_or_else(|| ShapeError::MissingField {
        field: name.to_string(),
    })
}

fn reject_unexpected(object: &Map<String, Value>, allowed: &[&str]) -> Result<()> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(ShapeError::UnexpectedField { field: key.clone() }),
        None => Ok(()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
