use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::evaluation::domain::{Requirements, SeniorityLevel, SkillCategory, SkillSet};
use crate::workflows::evaluation::model::{LanguageModel, ModelError};
use crate::workflows::evaluation::scoring::MatchResult;
use crate::workflows::evaluation::seniority::EstimationMode;
use crate::workflows::evaluation::skills::SkillCatalog;
use crate::workflows::evaluation::stages::{
    GapDetectorStage, MatchInput, PipelineStages, SeniorityEvaluatorStage, SkillAnalystStage,
    Stage, StageBackend, StageError, StageName,
};
use crate::workflows::evaluation::{evaluation_router, EvaluationService, EvaluatorSettings};

pub(super) const SENIOR_RESUME: &str = "Senior Backend Engineer\n\
    8 years of experience building APIs with Python, Django and FastAPI.\n\
    Deployed services on AWS with Docker and Kubernetes, backed by PostgreSQL and Redis.\n\
    Agile teams, leadership and mentoring.";

pub(super) const JUNIOR_RESUME: &str =
    "Junior developer with 1 year of experience in JavaScript and React. Teamwork.";

pub(super) fn backend_requirements() -> Requirements {
    Requirements::new(["Python", "AWS", "Docker"], SeniorityLevel::Senior)
        .with_minimum_years(5)
        .with_soft_skills(["leadership", "mentoring"])
}

pub(super) fn skill_set(entries: &[(SkillCategory, &str)]) -> SkillSet {
    entries.iter().map(|(category, skill)| (*category, *skill)).collect()
}

pub(super) fn catalog() -> Arc<SkillCatalog> {
    Arc::new(SkillCatalog::builtin())
}

/// Replies from a queue and records every prompt it receives. An empty queue fails the call.
#[derive(Default)]
pub(super) struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub(super) fn replying<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(str::to_string).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing() -> Self {
        Self::default()
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        self.replies
            .lock()
            .expect("reply queue poisoned")
            .pop_front()
            .ok_or_else(|| ModelError::Request("connection refused".to_string()))
    }
}

pub(super) struct PanickingScorer;

impl Stage for PanickingScorer {
    type Input = MatchInput;
    type Output = MatchResult;

    fn name(&self) -> StageName {
        StageName::MatchCalculator
    }

    fn execute(&self, _input: &MatchInput) -> Result<MatchResult, StageError> {
        panic!("scoring table corrupted")
    }
}

pub(super) struct FailingScorer;

impl Stage for FailingScorer {
    type Input = MatchInput;
    type Output = MatchResult;

    fn name(&self) -> StageName {
        StageName::MatchCalculator
    }

    fn execute(&self, _input: &MatchInput) -> Result<MatchResult, StageError> {
        Err(StageError::Failed("scoring backend offline".to_string()))
    }
}

/// Local stages with the scorer swapped out.
pub(super) fn stages_with_scorer(
    scoring: Box<dyn Stage<Input = MatchInput, Output = MatchResult>>,
) -> PipelineStages {
    PipelineStages {
        skills: Box::new(SkillAnalystStage::new(StageBackend::Structured, catalog())),
        seniority: Box::new(SeniorityEvaluatorStage::new(
            StageBackend::Structured,
            EstimationMode::Composite,
        )),
        gaps: Box::new(GapDetectorStage::new(StageBackend::Structured)),
        scoring,
    }
}

pub(super) fn local_router() -> axum::Router {
    evaluation_router(Arc::new(EvaluationService::local(EvaluatorSettings::default())))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("json body")
}
