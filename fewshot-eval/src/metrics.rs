//! Standard answer-comparison metrics.
//!
//! Each constructor returns a closure usable anywhere a
//! [`Metric`](fewshot_types::Metric) is expected.

use fewshot_types::example::{Example, Prediction};
use fewshot_types::program::TraceStep;
use serde_json::Value;

/// 1.0 when the prediction's `field` equals the example's `field` exactly
/// (JSON equality), else 0.0. A missing field on either side scores 0.0.
pub fn exact_match(
    field: impl Into<String>,
) -> impl Fn(&Example, &Prediction, Option<&[TraceStep]>) -> f64 + Send + Sync + 'static {
    let field = field.into();
    move |example, prediction, _trace| match (example.get(&field), prediction.get(&field)) {
        (Some(expected), Some(actual)) if expected == actual => 1.0,
        _ => 0.0,
    }
}

/// Like [`exact_match`], but string values are compared after
/// [`normalize_text`]. Non-string values fall back to JSON equality.
pub fn normalized_match(
    field: impl Into<String>,
) -> impl Fn(&Example, &Prediction, Option<&[TraceStep]>) -> f64 + Send + Sync + 'static {
    let field = field.into();
    move |example, prediction, _trace| match (example.get(&field), prediction.get(&field)) {
        (Some(Value::String(expected)), Some(Value::String(actual)))
            if normalize_text(expected) == normalize_text(actual) =>
        {
            1.0
        }
        (Some(expected), Some(actual)) if expected == actual => 1.0,
        _ => 0.0,
    }
}

/// Lowercase, drop punctuation and the articles "a", "an", "the", and
/// collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    lowered
        .split_whitespace()
        .filter(|w| !matches!(*w, "a" | "an" | "the"))
        .collect::<Vec<_>>()
        .join(" ")
}
