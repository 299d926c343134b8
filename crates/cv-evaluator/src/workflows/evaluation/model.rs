//! Boundary to the optional language-model backend.
//!
//! The transport is supplied by the embedding application. Every stage treats the model
//! as optional: when [`LanguageModel::is_available`] is false, or an answer cannot be
//! used, the stage runs its local rules instead.

use serde_json::{json, Value};

const JSON_ONLY_INSTRUCTION: &str = "Respond ONLY with valid JSON, no additional text.";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("language model unavailable")]
    Unavailable,
    #[error("language model request failed: {0}")]
    Request(String),
}

/// Synchronous text-in/text-out model.
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }

    fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    /// Asks for a JSON answer and extracts the object from the reply.
    fn generate_json(&self, prompt: &str) -> Result<Value, ModelError> {
        let prompt = format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}");
        let answer = self.generate(&prompt)?;
        Ok(extract_json(&answer))
    }
}

/// Backend used when no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableModel;

impl LanguageModel for UnavailableModel {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::Unavailable)
    }
}

/// Parses the span from the first `{` to the last `}`; anything else is wrapped as
/// `{"raw_response": text}`.
pub fn extract_json(text: &str) -> Value {
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                return value;
            }
        }
    }

    json!({ "raw_response": text })
}

pub(crate) fn string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    value.get(key)?.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

pub(crate) fn number(value: &Value, key: &str) -> Option<f64> {
    value.get(key)?.as_f64()
}
