//! Client-facing -> upstream model name rewriting.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// What `apply_model_mapping` did to the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    /// `model` was a mapped name and has been replaced.
    Mapped { from: String, to: String },
    /// `model` is a string with no mapping entry.
    Unmapped(String),
    /// `model` is absent or not a string.
    NoModel,
}

/// Rewrite the top-level `model` field in place when it names a mapped model.
///
/// Every other field, and a `model` that is missing, non-string or unmapped,
/// is left exactly as it was.
pub fn apply_model_mapping(
    body: &mut Map<String, Value>,
    mapping: &HashMap<String, String>,
) -> MappingOutcome {
    let Some(Value::String(model)) = body.get_mut("model") else {
        return MappingOutcome::NoModel;
    };

    match mapping.get(model.as_str()) {
        Some(mapped) => {
            let from = std::mem::replace(model, mapped.clone());
            MappingOutcome::Mapped { from, to: mapped.clone() }
        }
        None => MappingOutcome::Unmapped(model.clone()),
    }
}
