//! Examples and predictions: the records that flow through a program.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record of a training or validation set.
///
/// Fields are an ordered map of name → JSON value. The keys listed in
/// `input_keys` are what a program receives; every other field is a label
/// the metric may compare against. Optimizers only ever read and reorder
/// copies of examples, never mutate the caller's originals.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// All fields of the example, inputs and labels alike.
    pub fields: Map<String, Value>,

    /// Which of `fields` are inputs.
    #[serde(default)]
    pub input_keys: Vec<String>,

    /// True when this example was produced by running a program
    /// (a bootstrapped demonstration) rather than taken from a dataset.
    #[serde(default)]
    pub augmented: bool,
}

impl Example {
    /// Create an empty example.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the updated example.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Mark the given keys as inputs. Replaces any previous input keys.
    pub fn with_inputs<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Mark this example as a bootstrapped demonstration.
    pub fn augmented(mut self) -> Self {
        self.augmented = true;
        self
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a field as a string slice, if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// The keys marked as inputs.
    pub fn input_keys(&self) -> &[String] {
        &self.input_keys
    }

    /// Whether `key` is one of the input keys.
    pub fn is_input(&self, key: &str) -> bool {
        self.input_keys.iter().any(|k| k == key)
    }

    /// Only the input fields, in field order.
    pub fn inputs(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(k, _)| self.is_input(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Only the label fields (everything that is not an input).
    pub fn labels(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(k, _)| !self.is_input(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// The output of a program or of a single predictor call.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Output fields.
    pub fields: Map<String, Value>,
}

impl Prediction {
    /// Create an empty prediction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the updated prediction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a field as a string slice, if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Prediction {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
