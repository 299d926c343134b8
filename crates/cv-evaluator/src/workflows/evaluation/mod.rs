//! Résumé-versus-job evaluation: skill extraction, seniority estimation, gap detection
//! and match scoring, run as a traced four-stage pipeline.
//!
//! Every stage works without a language model. When one is configured the stages ask it
//! first and fall back to their local rules on any unusable answer.

pub mod blueprint;
pub mod domain;
pub mod gaps;
pub mod ladder;
pub mod model;
pub mod pipeline;
pub(crate) mod prompts;
pub mod request;
pub mod router;
pub mod scoring;
pub mod seniority;
pub mod service;
pub mod settings;
pub mod skills;
pub mod stages;
pub mod trace;

#[cfg(test)]
mod tests;

pub use blueprint::{WorkflowBlueprint, WorkflowStep};
pub use domain::{EvaluationMethod, Requirements, SeniorityLevel, SkillCategory, SkillSet};
pub use gaps::{Criticality, GapAnalyzer, GapReport, MAX_VIABLE_GAPS};
pub use ladder::SeniorityLadder;
pub use model::{extract_json, LanguageModel, ModelError, UnavailableModel};
pub use pipeline::{
    CompleteEvaluation, EvaluationCoordinator, EvaluationResult, PipelineState, ResultMethod,
    UNKNOWN_SENIORITY,
};
pub use request::{EvaluationRequest, RequestError};
pub use router::evaluation_router;
pub use scoring::{MatchClassification, MatchResult, MatchScorer, PenaltyPolicy, ScoringConfig};
pub use seniority::{EstimationMode, SeniorityEstimate, SeniorityEstimator, SubEstimates};
pub use service::{evaluate_resume, EvaluationResponse, EvaluationService};
pub use settings::EvaluatorSettings;
pub use skills::{extract_years, CatalogError, SkillCatalog, SkillExtractor, SkillMatcher};
pub use stages::{
    PipelineStages, Stage, StageBackend, StageError, StageName, SkillsExtraction,
};
pub use trace::{traced, StageStatus, TraceLog, TraceRecord};
