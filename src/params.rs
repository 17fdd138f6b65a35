//! Parameter tuples and the shape check applied to raw parameter source output.
//!
//! A parameter source returns opaque JSON values. Each value must be an array; the array
//! becomes one [`ParameterTuple`]. The check runs where the source result is inspected,
//! which for deferred suites is after class setup has already happened.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{SuiteError, TestFailure};

/// One ordered, fixed-arity parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTuple(Vec<Value>);

impl ParameterTuple {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Decodes the element at `index` into any deserializable type.
    pub fn decode<D: DeserializeOwned>(&self, index: usize) -> Result<D, TestFailure> {
        let value = self.0.get(index).ok_or_else(|| {
            TestFailure::error(format!(
                "parameter {} requested but the tuple has {} element(s)",
                index,
                self.0.len()
            ))
        })?;
        D::deserialize(value).map_err(|e| {
            TestFailure::error(format!("parameter {} ({}) has the wrong type: {}", index, value, e))
        })
    }

    /// Decodes the whole tuple at once, e.g. into `(i64, i64)` or a tuple struct.
    pub fn decode_all<D: DeserializeOwned>(&self) -> Result<D, TestFailure> {
        D::deserialize(Value::Array(self.0.clone()))
            .map_err(|e| TestFailure::error(format!("parameters {} do not decode: {}", self, e)))
    }

    pub fn int(&self, index: usize) -> Result<i64, TestFailure> {
        self.decode(index)
    }

    pub fn string(&self, index: usize) -> Result<String, TestFailure> {
        self.decode(index)
    }
}

impl fmt::Display for ParameterTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Array(self.0.clone()))
    }
}

impl From<Vec<Value>> for ParameterTuple {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Checks that every raw element is an array and converts it into a tuple, in order.
pub(crate) fn shape_tuples(
    template: &str,
    method: &str,
    raw: Vec<Value>,
) -> Result<Vec<ParameterTuple>, SuiteError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Array(values) => Ok(ParameterTuple(values)),
            other => Err(SuiteError::MalformedTuple {
                template: template.to_string(),
                method: method.to_string(),
                index,
                found: kind_of(&other).to_string(),
            }),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
