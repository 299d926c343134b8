use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::Requirements;
use super::ladder::SeniorityLadder;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `minimum_years` must be non-negative, got {0}")]
    NegativeYears(i64),
}

/// Raw evaluation input as received over HTTP or from the CLI.
///
/// The Spanish keys `cv`, `stack_requerido`, `nivel_solicitado`, `experiencia_minima` and
/// `habilidades_blandas` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(alias = "cv")]
    pub resume_text: String,
    #[serde(alias = "stack_requerido")]
    pub required_stack: Vec<String>,
    #[serde(alias = "nivel_solicitado")]
    pub requested_level: String,
    #[serde(default, alias = "experiencia_minima")]
    pub minimum_years: u32,
    #[serde(default, alias = "habilidades_blandas")]
    pub soft_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_trace: Option<bool>,
}

impl EvaluationRequest {
    /// Validates a raw JSON body, naming the first offending field.
    pub fn from_value(value: &Value) -> Result<Self, RequestError> {
        let object = value.as_object().ok_or(RequestError::NotAnObject)?;

        let resume_text = required(object, "resume_text", "cv")?
            .as_str()
            .ok_or(RequestError::InvalidType {
                field: "resume_text",
                expected: "a string",
            })?
            .to_string();
        let required_stack =
            string_array(required(object, "required_stack", "stack_requerido")?, "required_stack")?;
        let requested_level = required(object, "requested_level", "nivel_solicitado")?
            .as_str()
            .ok_or(RequestError::InvalidType {
                field: "requested_level",
                expected: "a string",
            })?
            .to_string();

        let minimum_years = match optional(object, "minimum_years", "experiencia_minima") {
            None => 0,
            Some(raw) => minimum_years(raw)?,
        };
        let soft_skills = match optional(object, "soft_skills", "habilidades_blandas") {
            None => Vec::new(),
            Some(raw) => string_array(raw, "soft_skills")?,
        };
        let include_trace = match object.get("include_trace") {
            None | Some(Value::Null) => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(_) => {
                return Err(RequestError::InvalidType {
                    field: "include_trace",
                    expected: "a boolean",
                })
            }
        };

        Ok(Self {
            resume_text,
            required_stack,
            requested_level,
            minimum_years,
            soft_skills,
            include_trace,
        })
    }

    /// Job requirements with the requested level normalized onto the ladder.
    pub fn requirements(&self) -> Requirements {
        Requirements::new(
            self.required_stack.iter().cloned(),
            SeniorityLadder::normalize(&self.requested_level),
        )
        .with_minimum_years(self.minimum_years)
        .with_soft_skills(self.soft_skills.iter().cloned())
    }
}

fn optional<'a>(object: &'a Map<String, Value>, key: &str, alias: &str) -> Option<&'a Value> {
    object
        .get(key)
        .or_else(|| object.get(alias))
        .filter(|value| !value.is_null())
}

fn required<'a>(
    object: &'a Map<String, Value>,
    key: &'static str,
    alias: &str,
) -> Result<&'a Value, RequestError> {
    optional(object, key, alias).ok_or(RequestError::MissingField(key))
}

fn string_array(value: &Value, field: &'static str) -> Result<Vec<String>, RequestError> {
    let invalid = RequestError::InvalidType {
        field,
        expected: "an array of strings",
    };
    let items = value.as_array().ok_or_else(|| invalid.clone())?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid.clone()))
        .collect()
}

fn minimum_years(value: &Value) -> Result<u32, RequestError> {
    let invalid = RequestError::InvalidType {
        field: "minimum_years",
        expected: "a non-negative integer",
    };
    if let Some(years) = value.as_u64() {
        return u32::try_from(years).map_err(|_| invalid);
    }
    match value.as_i64() {
        Some(years) => Err(RequestError::NegativeYears(years)),
        None => Err(invalid),
    }
}
