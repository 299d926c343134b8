use std::sync::Arc;

use serde::Serialize;

use super::blueprint::WorkflowBlueprint;
use super::model::{LanguageModel, UnavailableModel};
use super::pipeline::{CompleteEvaluation, EvaluationCoordinator, EvaluationResult};
use super::request::EvaluationRequest;
use super::settings::EvaluatorSettings;

/// Either the bare result or the result with its trace, depending on `include_trace`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvaluationResponse {
    Result(EvaluationResult),
    Complete(CompleteEvaluation),
}

impl EvaluationResponse {
    pub fn result(&self) -> &EvaluationResult {
        match self {
            Self::Result(result) => result,
            Self::Complete(complete) => &complete.result,
        }
    }
}

/// Shared entry point for HTTP and CLI callers. Builds a fresh coordinator per request so
/// concurrent evaluations never share a trace.
pub struct EvaluationService {
    settings: EvaluatorSettings,
    model: Arc<dyn LanguageModel>,
}

impl EvaluationService {
    pub fn new(settings: EvaluatorSettings, model: Arc<dyn LanguageModel>) -> Self {
        Self { settings, model }
    }

    /// Service without a model; every stage uses its local rules.
    pub fn local(settings: EvaluatorSettings) -> Self {
        Self::new(settings, Arc::new(UnavailableModel))
    }

    pub fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }

    pub fn coordinator(&self) -> EvaluationCoordinator {
        EvaluationCoordinator::new(&self.settings, self.model.clone())
    }

    pub fn blueprint(&self) -> WorkflowBlueprint {
        WorkflowBlueprint::for_method(self.settings.method)
    }

    pub fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResponse {
        let complete = self
            .coordinator()
            .evaluate(&request.requirements(), &request.resume_text);

        if request.include_trace.unwrap_or(self.settings.include_trace) {
            EvaluationResponse::Complete(complete)
        } else {
            EvaluationResponse::Result(complete.result)
        }
    }
}

/// One-shot evaluation returning only the public result.
pub fn evaluate_resume(
    settings: &EvaluatorSettings,
    model: Arc<dyn LanguageModel>,
    request: &EvaluationRequest,
) -> EvaluationResult {
    EvaluationCoordinator::new(settings, model)
        .evaluate(&request.requirements(), &request.resume_text)
        .result
}
