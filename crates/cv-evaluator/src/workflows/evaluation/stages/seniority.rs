use serde_json::Value;

use super::super::ladder::SeniorityLadder;
use super::super::model::string_list;
use super::super::prompts;
use super::super::seniority::{
    coherence_report, is_coherent, title_indicators, EstimationMode, SeniorityEstimate,
    SeniorityEstimator,
};
use super::{ask_model, SeniorityInput, Stage, StageBackend, StageError, StageName};

pub struct SeniorityEvaluatorStage {
    backend: StageBackend,
    estimator: SeniorityEstimator,
}

impl SeniorityEvaluatorStage {
    pub fn new(backend: StageBackend, mode: EstimationMode) -> Self {
        Self {
            backend,
            estimator: SeniorityEstimator::new(mode),
        }
    }

    fn from_answer(
        &self,
        answer: &Value,
        input: &SeniorityInput,
        model_name: &str,
    ) -> Option<SeniorityEstimate> {
        let level = answer
            .get("seniority_estimado")
            .and_then(Value::as_str)
            .map(SeniorityLadder::normalize)?;
        let years_experience = answer
            .get("experiencia_detectada")
            .and_then(Value::as_u64)
            .and_then(|years| u32::try_from(years).ok())
            .unwrap_or(input.years_experience);
        let coherent = answer
            .get("coherente")
            .and_then(Value::as_bool)
            .unwrap_or_else(|| is_coherent(level, years_experience));
        let rationale = answer
            .get("fundamento")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("estimated by {model_name}"));
        let indicators = string_list(answer, "indicadores_encontrados")
            .unwrap_or_else(|| title_indicators(&input.resume_text));
        let (_, coherence_note) =
            coherence_report(level, years_experience, input.skills.total());

        Some(SeniorityEstimate {
            level,
            coherent,
            rationale,
            years_experience,
            sub_estimates: None,
            indicators,
            coherence_note,
        })
    }
}

impl Stage for SeniorityEvaluatorStage {
    type Input = SeniorityInput;
    type Output = SeniorityEstimate;

    fn name(&self) -> StageName {
        StageName::SeniorityEvaluator
    }

    fn execute(&self, input: &SeniorityInput) -> Result<SeniorityEstimate, StageError> {
        let from_model = self.backend.available_model().and_then(|model| {
            let requested = input.requested_level.label();
            let prompt = if self.backend.is_crew() {
                prompts::crew::profile_evaluator(&input.resume_text, requested)
            } else {
                prompts::seniority_evaluator(&input.resume_text, requested, input.minimum_years)
            };
            ask_model(self.name(), model, &prompt, |answer| {
                self.from_answer(answer, input, model.name())
            })
        });

        Ok(from_model.unwrap_or_else(|| {
            self.estimator.estimate(
                input.years_experience,
                &input.resume_text,
                &input.skills,
                input.requested_level,
            )
        }))
    }
}
