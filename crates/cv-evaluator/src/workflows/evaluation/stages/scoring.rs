use serde_json::Value;

use super::super::model::number;
use super::super::prompts;
use super::super::scoring::{
    round_one_decimal, MatchClassification, MatchResult, MatchScorer, ScoringConfig,
};
use super::{ask_model, MatchInput, Stage, StageBackend, StageError, StageName};

/// Final scoring. The crew backend always scores locally.
pub struct MatchCalculatorStage {
    backend: StageBackend,
    scorer: MatchScorer,
}

impl MatchCalculatorStage {
    pub fn new(backend: StageBackend, config: ScoringConfig) -> Self {
        Self {
            backend,
            scorer: MatchScorer::new(config),
        }
    }

    fn from_answer(&self, answer: &Value, local: &MatchResult) -> Option<MatchResult> {
        let match_percentage = percentage(answer, "porcentaje_match")?;
        let classification = answer
            .get("clasificacion")
            .and_then(Value::as_str)
            .and_then(MatchClassification::parse)
            .unwrap_or_else(|| self.scorer.classify(match_percentage));
        let summary = answer
            .get("resumen")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| local.summary.clone());

        Some(MatchResult {
            match_percentage,
            technical_match: percentage(answer, "match_tecnico").unwrap_or(local.technical_match),
            seniority_match: percentage(answer, "match_seniority")
                .unwrap_or(local.seniority_match),
            requested_level: local.requested_level,
            estimated_level: local.estimated_level,
            classification,
            summary,
        })
    }
}

impl Stage for MatchCalculatorStage {
    type Input = MatchInput;
    type Output = MatchResult;

    fn name(&self) -> StageName {
        StageName::MatchCalculator
    }

    fn execute(&self, input: &MatchInput) -> Result<MatchResult, StageError> {
        let local = self.scorer.score(
            &input.matched_skills,
            &input.required_stack,
            input.estimated_level,
            input.requested_level,
            &input.critical_gaps,
        );
        if self.backend.is_crew() {
            return Ok(local);
        }

        let from_model = self.backend.available_model().and_then(|model| {
            let prompt = prompts::match_calculator(
                &input.matched_skills,
                &input.required_stack,
                input.estimated_level.label(),
                input.requested_level.label(),
                &input.critical_gaps,
            );
            ask_model(self.name(), model, &prompt, |answer| {
                self.from_answer(answer, &local)
            })
        });

        Ok(from_model.unwrap_or(local))
    }
}

fn percentage(answer: &Value, key: &str) -> Option<f64> {
    number(answer, key)
        .filter(|value| value.is_finite())
        .map(|value| round_one_decimal(value.clamp(0.0, 100.0)))
}
