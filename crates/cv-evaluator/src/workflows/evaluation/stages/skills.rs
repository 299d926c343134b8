use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::domain::{SeniorityLevel, SkillCategory, SkillSet};
use super::super::ladder::SeniorityLadder;
use super::super::model::string_list;
use super::super::prompts;
use super::super::skills::{extract_years, SkillCatalog, SkillExtractor};
use super::{ask_model, SkillsInput, Stage, StageBackend, StageError, StageName};

/// Output of the skill-analysis stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsExtraction {
    pub skills: SkillSet,
    pub years_experience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_reported_level: Option<SeniorityLevel>,
}

pub struct SkillAnalystStage {
    backend: StageBackend,
    extractor: SkillExtractor,
}

impl SkillAnalystStage {
    pub fn new(backend: StageBackend, catalog: Arc<SkillCatalog>) -> Self {
        Self {
            backend,
            extractor: SkillExtractor::new(catalog),
        }
    }

    pub fn extract_locally(&self, resume_text: &str) -> SkillsExtraction {
        let years_experience = extract_years(resume_text);
        SkillsExtraction {
            skills: self.extractor.extract(resume_text),
            years_experience,
            self_reported_level: Some(coarse_level(years_experience)),
        }
    }

    fn from_answer(&self, answer: &Value, resume_text: &str) -> Option<SkillsExtraction> {
        let technical = string_list(answer, "skills_tecnicas")?;
        let soft = string_list(answer, "skills_blandas").unwrap_or_default();
        let catalog = self.extractor.catalog();

        let mut skills = SkillSet::new();
        for skill in &technical {
            skills.insert(catalog.category_of(skill), skill);
        }
        for skill in &soft {
            skills.insert(SkillCategory::SoftSkills, skill);
        }

        let years_experience = answer
            .get("experiencia_anios")
            .and_then(Value::as_u64)
            .and_then(|years| u32::try_from(years).ok())
            .unwrap_or_else(|| extract_years(resume_text));
        let self_reported_level = answer
            .get("nivel_autodetectado")
            .and_then(Value::as_str)
            .map(SeniorityLadder::normalize);

        Some(SkillsExtraction {
            skills,
            years_experience,
            self_reported_level,
        })
    }
}

impl Stage for SkillAnalystStage {
    type Input = SkillsInput;
    type Output = SkillsExtraction;

    fn name(&self) -> StageName {
        StageName::SkillAnalyst
    }

    fn execute(&self, input: &SkillsInput) -> Result<SkillsExtraction, StageError> {
        let resume_text = input.resume_text.as_str();
        if resume_text.trim().is_empty() {
            return Err(StageError::EmptyResume);
        }

        let from_model = self.backend.available_model().and_then(|model| {
            let prompt = if self.backend.is_crew() {
                prompts::crew::technical_analyst(resume_text)
            } else {
                prompts::skill_analyst(resume_text)
            };
            ask_model(self.name(), model, &prompt, |answer| {
                self.from_answer(answer, resume_text)
            })
        });

        Ok(from_model.unwrap_or_else(|| self.extract_locally(resume_text)))
    }
}

fn coarse_level(years_experience: u32) -> SeniorityLevel {
    match years_experience {
        0..=2 => SeniorityLevel::Junior,
        3 => SeniorityLevel::SemiSenior,
        _ => SeniorityLevel::Senior,
    }
}
