use serde_json::Value;

use super::super::gaps::{partition, GapAnalyzer, GapReport};
use super::super::model::string_list;
use super::super::prompts;
use super::{ask_model, GapInput, Stage, StageBackend, StageError, StageName};

pub struct GapDetectorStage {
    backend: StageBackend,
    analyzer: GapAnalyzer,
}

impl GapDetectorStage {
    pub fn new(backend: StageBackend) -> Self {
        Self {
            backend,
            analyzer: GapAnalyzer,
        }
    }

    /// The model's lists are reconciled against the required stack so that matched and
    /// missing skills always partition it.
    fn from_answer(&self, answer: &Value, input: &GapInput) -> Option<GapReport> {
        let (matched, critical_gaps) = match string_list(answer, "skills_coincidentes") {
            Some(coinciding) => partition(&input.required_stack, &coinciding),
            None => {
                let reported = string_list(answer, "brechas_criticas")?;
                let (missing, matched) = partition(&input.required_stack, &reported);
                (matched, missing)
            }
        };
        let (_, soft_skill_gaps) = partition(&input.soft_skills, input.skills.soft_skills());

        Some(GapAnalyzer::report(
            input.required_stack.len(),
            matched,
            critical_gaps,
            soft_skill_gaps,
        ))
    }
}

impl Stage for GapDetectorStage {
    type Input = GapInput;
    type Output = GapReport;

    fn name(&self) -> StageName {
        StageName::GapDetector
    }

    fn execute(&self, input: &GapInput) -> Result<GapReport, StageError> {
        let from_model = self.backend.available_model().and_then(|model| {
            let prompt = if self.backend.is_crew() {
                prompts::crew::gap_analyst(&input.resume_text, &input.required_stack)
            } else {
                prompts::gap_detector(&input.resume_text, &input.required_stack)
            };
            ask_model(self.name(), model, &prompt, |answer| {
                self.from_answer(answer, input)
            })
        });

        Ok(from_model.unwrap_or_else(|| {
            self.analyzer
                .analyze(&input.required_stack, &input.soft_skills, &input.skills)
        }))
    }
}
