//! Sequences the four stages for one résumé and assembles the public result.
//!
//! Stages run in a fixed order, each through [`traced`], so a failing stage degrades to
//! its default output instead of stopping the pipeline. A panic that escapes a stage is
//! caught here and reported as the error result; the caller always gets an answer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::blueprint::WorkflowBlueprint;
use super::domain::{EvaluationMethod, Requirements};
use super::gaps::GapReport;
use super::model::LanguageModel;
use super::scoring::{MatchClassification, MatchResult};
use super::seniority::SeniorityEstimate;
use super::settings::EvaluatorSettings;
use super::stages::{
    GapInput, MatchInput, PipelineStages, SeniorityInput, SkillsExtraction, SkillsInput,
    StageBackend, StageName,
};
use super::trace::{traced, TraceLog, TraceRecord};

/// Seniority reported when the pipeline could not finish.
pub const UNKNOWN_SENIORITY: &str = "desconocido";

/// Progress of the current evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Idle,
    SkillsExtracted,
    SeniorityEstimated,
    GapsDetected,
    MatchScored,
    Done,
    Failed,
}

impl PipelineState {
    /// Stage that runs from this state, if any.
    pub const fn next_stage(self) -> Option<StageName> {
        match self {
            Self::Idle => Some(StageName::SkillAnalyst),
            Self::SkillsExtracted => Some(StageName::SeniorityEvaluator),
            Self::SeniorityEstimated => Some(StageName::GapDetector),
            Self::GapsDetected => Some(StageName::MatchCalculator),
            Self::MatchScored | Self::Done | Self::Failed => None,
        }
    }
}

/// Method tag carried by a complete evaluation. `error` marks a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultMethod {
    #[serde(rename = "estructurado")]
    Structured,
    #[serde(rename = "langchain")]
    LangChain,
    #[serde(rename = "crew_ai")]
    CrewAi,
    #[serde(rename = "error")]
    Error,
}

impl From<EvaluationMethod> for ResultMethod {
    fn from(method: EvaluationMethod) -> Self {
        match method {
            EvaluationMethod::Structured => Self::Structured,
            EvaluationMethod::LangChain => Self::LangChain,
            EvaluationMethod::CrewAi => Self::CrewAi,
        }
    }
}

/// Public outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub match_percentage: f64,
    pub estimated_seniority: String,
    pub critical_gaps: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub coherent: bool,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<MatchClassification>,
}

impl EvaluationResult {
    pub fn failed(message: &str) -> Self {
        Self {
            match_percentage: 0.0,
            estimated_seniority: UNKNOWN_SENIORITY.to_string(),
            critical_gaps: Vec::new(),
            matched_skills: Vec::new(),
            missing_skills: Vec::new(),
            coherent: false,
            summary: format!("Evaluation failed: {message}"),
            classification: None,
        }
    }

    fn assemble(estimate: &SeniorityEstimate, gaps: GapReport, score: MatchResult) -> Self {
        Self {
            match_percentage: score.match_percentage,
            estimated_seniority: estimate.level.label().to_string(),
            missing_skills: gaps.critical_gaps.clone(),
            critical_gaps: gaps.critical_gaps,
            matched_skills: gaps.matched,
            coherent: estimate.coherent,
            summary: score.summary,
            classification: Some(score.classification),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.classification.is_none() && self.estimated_seniority == UNKNOWN_SENIORITY
    }
}

/// Result plus the trace records and method of the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteEvaluation {
    #[serde(flatten)]
    pub result: EvaluationResult,
    pub trace: Vec<TraceRecord>,
    pub method: ResultMethod,
    pub started_at: DateTime<Utc>,
}

/// Runs evaluations and keeps an append-only trace across them until reset.
pub struct EvaluationCoordinator {
    backend: StageBackend,
    stages: PipelineStages,
    log: TraceLog,
    state: PipelineState,
}

impl EvaluationCoordinator {
    pub fn new(settings: &EvaluatorSettings, model: Arc<dyn LanguageModel>) -> Self {
        let backend = StageBackend::new(settings.method, model);
        let stages = PipelineStages::build(&backend, settings);
        Self::with_stages(backend, stages)
    }

    /// Coordinator over caller-supplied stages.
    pub fn with_stages(backend: StageBackend, stages: PipelineStages) -> Self {
        Self {
            backend,
            stages,
            log: TraceLog::new(),
            state: PipelineState::Idle,
        }
    }

    pub fn method(&self) -> EvaluationMethod {
        self.backend.method()
    }

    pub fn blueprint(&self) -> WorkflowBlueprint {
        WorkflowBlueprint::for_method(self.method())
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every record appended since construction or the last reset.
    pub fn trace(&self) -> &[TraceRecord] {
        self.log.records()
    }

    pub fn reset_trace(&mut self) {
        self.log.clear();
    }

    pub fn evaluate(
        &mut self,
        requirements: &Requirements,
        resume_text: &str,
    ) -> CompleteEvaluation {
        let started_at = Utc::now();
        let first_record = self.log.len();
        let method = self.method();
        self.state = PipelineState::Idle;

        info!(
            method = method.label(),
            required_skills = requirements.required_stack.len(),
            requested_level = requirements.requested_level.label(),
            "evaluation started"
        );

        let stages = &self.stages;
        let log = &mut self.log;
        let state = &mut self.state;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            run_stages(stages, log, state, requirements, resume_text)
        }));

        let (result, method) = match outcome {
            Ok(result) => {
                self.state = PipelineState::Done;
                info!(
                    method = method.label(),
                    match_percentage = result.match_percentage,
                    estimated_seniority = %result.estimated_seniority,
                    "evaluation completed"
                );
                (result, ResultMethod::from(method))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let stage = self.state.next_stage().map_or("unknown", StageName::label);
                error!(stage, error = %message, "evaluation aborted");
                self.state = PipelineState::Failed;
                (EvaluationResult::failed(&message), ResultMethod::Error)
            }
        };

        CompleteEvaluation {
            result,
            trace: self.log.since(first_record).to_vec(),
            method,
            started_at,
        }
    }
}

fn run_stages(
    stages: &PipelineStages,
    log: &mut TraceLog,
    state: &mut PipelineState,
    requirements: &Requirements,
    resume_text: &str,
) -> EvaluationResult {
    let extraction: SkillsExtraction = traced(
        log,
        stages.skills.as_ref(),
        &SkillsInput {
            resume_text: resume_text.to_string(),
        },
    );
    *state = PipelineState::SkillsExtracted;

    let estimate = traced(
        log,
        stages.seniority.as_ref(),
        &SeniorityInput {
            resume_text: resume_text.to_string(),
            requested_level: requirements.requested_level,
            minimum_years: requirements.minimum_years,
            years_experience: extraction.years_experience,
            skills: extraction.skills.clone(),
        },
    );
    *state = PipelineState::SeniorityEstimated;

    let gaps = traced(
        log,
        stages.gaps.as_ref(),
        &GapInput {
            resume_text: resume_text.to_string(),
            required_stack: requirements.required_stack.clone(),
            soft_skills: requirements.soft_skills.clone(),
            skills: extraction.skills,
        },
    );
    *state = PipelineState::GapsDetected;

    let score = traced(
        log,
        stages.scoring.as_ref(),
        &MatchInput {
            matched_skills: gaps.matched.clone(),
            required_stack: requirements.required_stack.clone(),
            estimated_level: estimate.level,
            requested_level: requirements.requested_level,
            critical_gaps: gaps.critical_gaps.clone(),
        },
    );
    *state = PipelineState::MatchScored;

    EvaluationResult::assemble(&estimate, gaps, score)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "stage panicked".to_string())
}
