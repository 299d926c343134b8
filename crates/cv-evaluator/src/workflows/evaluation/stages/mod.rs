//! The four pipeline stages behind a single [`Stage`] interface.
//!
//! Each stage picks its implementation from a [`StageBackend`] chosen when the
//! coordinator is built. Model-backed variants fall back to the local rules whenever the
//! model is unavailable or its answer cannot be used.

mod gaps;
mod scoring;
mod seniority;
mod skills;

pub use gaps::GapDetectorStage;
pub use scoring::MatchCalculatorStage;
pub use seniority::SeniorityEvaluatorStage;
pub use skills::{SkillAnalystStage, SkillsExtraction};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::domain::{EvaluationMethod, SeniorityLevel, SkillSet};
use super::gaps::GapReport;
use super::model::LanguageModel;
use super::scoring::MatchResult;
use super::seniority::SeniorityEstimate;
use super::settings::EvaluatorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    SkillAnalyst,
    SeniorityEvaluator,
    GapDetector,
    MatchCalculator,
}

impl StageName {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::SkillAnalyst,
            Self::SeniorityEvaluator,
            Self::GapDetector,
            Self::MatchCalculator,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SkillAnalyst => "skill_analyst",
            Self::SeniorityEvaluator => "seniority_evaluator",
            Self::GapDetector => "gap_detector",
            Self::MatchCalculator => "match_calculator",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("résumé text is empty")]
    EmptyResume,
    #[error("{0}")]
    Failed(String),
}

/// One pipeline step: a named, synchronous transformation of an input snapshot.
pub trait Stage: Send + Sync {
    type Input: Serialize;
    type Output: Serialize + Default;

    fn name(&self) -> StageName;

    fn execute(&self, input: &Self::Input) -> Result<Self::Output, StageError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsInput {
    pub resume_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeniorityInput {
    pub resume_text: String,
    pub requested_level: SeniorityLevel,
    pub minimum_years: u32,
    pub years_experience: u32,
    pub skills: SkillSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapInput {
    pub resume_text: String,
    pub required_stack: Vec<String>,
    pub soft_skills: Vec<String>,
    pub skills: SkillSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInput {
    pub matched_skills: Vec<String>,
    pub required_stack: Vec<String>,
    pub estimated_level: SeniorityLevel,
    pub requested_level: SeniorityLevel,
    pub critical_gaps: Vec<String>,
}

/// Implementation family shared by all four stages.
#[derive(Clone)]
pub enum StageBackend {
    Structured,
    LangChain(Arc<dyn LanguageModel>),
    CrewAi(Arc<dyn LanguageModel>),
}

impl StageBackend {
    pub fn new(method: EvaluationMethod, model: Arc<dyn LanguageModel>) -> Self {
        match method {
            EvaluationMethod::Structured => Self::Structured,
            EvaluationMethod::LangChain => Self::LangChain(model),
            EvaluationMethod::CrewAi => Self::CrewAi(model),
        }
    }

    pub fn method(&self) -> EvaluationMethod {
        match self {
            Self::Structured => EvaluationMethod::Structured,
            Self::LangChain(_) => EvaluationMethod::LangChain,
            Self::CrewAi(_) => EvaluationMethod::CrewAi,
        }
    }

    /// The backing model, if this backend uses one and it reports itself available.
    pub fn available_model(&self) -> Option<&dyn LanguageModel> {
        match self {
            Self::Structured => None,
            Self::LangChain(model) | Self::CrewAi(model) => {
                Some(model.as_ref()).filter(|model| model.is_available())
            }
        }
    }

    pub(crate) fn is_crew(&self) -> bool {
        matches!(self, Self::CrewAi(_))
    }
}

impl fmt::Debug for StageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => f.write_str("Structured"),
            Self::LangChain(model) => f.debug_tuple("LangChain").field(&model.name()).finish(),
            Self::CrewAi(model) => f.debug_tuple("CrewAi").field(&model.name()).finish(),
        }
    }
}

/// Sends `prompt` and parses the answer, returning `None` (after logging) when the call
/// fails or the answer lacks what `parse` needs.
pub(crate) fn ask_model<T>(
    stage: StageName,
    model: &dyn LanguageModel,
    prompt: &str,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    match model.generate_json(prompt) {
        Ok(answer) => {
            let parsed = parse(&answer);
            if parsed.is_none() {
                warn!(
                    stage = stage.label(),
                    model = model.name(),
                    "model answer unusable, using local rules"
                );
            }
            parsed
        }
        Err(err) => {
            warn!(
                stage = stage.label(),
                model = model.name(),
                error = %err,
                "model call failed, using local rules"
            );
            None
        }
    }
}

/// The concrete stage set a coordinator runs, in pipeline order.
pub struct PipelineStages {
    pub skills: Box<dyn Stage<Input = SkillsInput, Output = SkillsExtraction>>,
    pub seniority: Box<dyn Stage<Input = SeniorityInput, Output = SeniorityEstimate>>,
    pub gaps: Box<dyn Stage<Input = GapInput, Output = GapReport>>,
    pub scoring: Box<dyn Stage<Input = MatchInput, Output = MatchResult>>,
}

impl PipelineStages {
    pub fn build(backend: &StageBackend, settings: &EvaluatorSettings) -> Self {
        Self {
            skills: Box::new(SkillAnalystStage::new(
                backend.clone(),
                settings.catalog.clone(),
            )),
            seniority: Box::new(SeniorityEvaluatorStage::new(
                backend.clone(),
                settings.seniority_mode,
            )),
            gaps: Box::new(GapDetectorStage::new(backend.clone())),
            scoring: Box::new(MatchCalculatorStage::new(backend.clone(), settings.scoring)),
        }
    }
}
