use std::sync::Arc;

use serde_json::json;

use super::common::*;

use crate::workflows::evaluation::domain::{SeniorityLevel, SkillCategory};
use crate::workflows::evaluation::model::{extract_json, LanguageModel, UnavailableModel};
use crate::workflows::evaluation::scoring::{MatchClassification, MatchScorer, ScoringConfig};
use crate::workflows::evaluation::seniority::EstimationMode;
use crate::workflows::evaluation::stages::{
    GapDetectorStage, GapInput, MatchCalculatorStage, MatchInput, SeniorityEvaluatorStage,
    SeniorityInput, SkillAnalystStage, SkillsInput, Stage, StageBackend, StageError,
};

fn skills_input(text: &str) -> SkillsInput {
    SkillsInput {
        resume_text: text.to_string(),
    }
}

fn gap_input() -> GapInput {
    GapInput {
        resume_text: SENIOR_RESUME.to_string(),
        required_stack: vec!["Python".to_string(), "AWS".to_string(), "Docker".to_string()],
        soft_skills: vec!["leadership".to_string()],
        skills: skill_set(&[(SkillCategory::SoftSkills, "leadership")]),
    }
}

fn match_input() -> MatchInput {
    MatchInput {
        matched_skills: vec!["Python".to_string(), "Docker".to_string()],
        required_stack: vec!["Python".to_string(), "AWS".to_string(), "Docker".to_string()],
        estimated_level: SeniorityLevel::Senior,
        requested_level: SeniorityLevel::Senior,
        critical_gaps: vec!["AWS".to_string()],
    }
}

fn langchain(model: &Arc<ScriptedModel>) -> StageBackend {
    StageBackend::LangChain(model.clone())
}

#[test]
fn extract_json_takes_the_outermost_object() {
    let value = extract_json("Here you go: {\"a\": {\"b\": 1}} hope it helps");
    assert_eq!(value, json!({"a": {"b": 1}}));

    let value = extract_json("I cannot answer that");
    assert_eq!(value, json!({"raw_response": "I cannot answer that"}));

    let value = extract_json("} backwards {");
    assert_eq!(value["raw_response"], "} backwards {");
}

#[test]
fn unavailable_model_is_never_offered_to_stages() {
    let backend = StageBackend::new(
        crate::workflows::evaluation::EvaluationMethod::LangChain,
        Arc::new(UnavailableModel),
    );
    assert!(backend.available_model().is_none());
    assert!(!UnavailableModel.is_available());
}

#[test]
fn skill_stage_rejects_blank_resume() {
    let stage = SkillAnalystStage::new(StageBackend::Structured, catalog());
    let error = stage.execute(&skills_input("   \n")).expect_err("blank résumé");
    assert!(matches!(error, StageError::EmptyResume));
}

#[test]
fn structured_skill_stage_is_idempotent() {
    let stage = SkillAnalystStage::new(StageBackend::Structured, catalog());
    let first = stage.execute(&skills_input(SENIOR_RESUME)).expect("extracts");
    let second = stage.execute(&skills_input(SENIOR_RESUME)).expect("extracts");

    assert_eq!(first, second);
    assert_eq!(first.years_experience, 8);
    assert_eq!(first.self_reported_level, Some(SeniorityLevel::Senior));
}

#[test]
fn langchain_skill_stage_uses_model_answer() {
    let model = Arc::new(ScriptedModel::replying([
        r#"Sure! {"skills_tecnicas": ["Rust", "Kubernetes"], "skills_blandas": ["Leadership"], "experiencia_anios": 9, "nivel_autodetectado": "Staff Engineer"}"#,
    ]));
    let stage = SkillAnalystStage::new(langchain(&model), catalog());

    let extraction = stage.execute(&skills_input(SENIOR_RESUME)).expect("extracts");

    assert_eq!(extraction.skills.get(SkillCategory::Languages), ["rust".to_string()]);
    assert_eq!(
        extraction.skills.get(SkillCategory::CloudDevops),
        ["kubernetes".to_string()]
    );
    assert_eq!(extraction.skills.soft_skills(), ["leadership".to_string()]);
    assert_eq!(extraction.years_experience, 9);
    assert_eq!(extraction.self_reported_level, Some(SeniorityLevel::Staff));

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Respond ONLY with valid JSON"));
}

#[test]
fn unusable_model_answer_falls_back_to_local_rules() {
    let model = Arc::new(ScriptedModel::replying(["I am not able to parse résumés today."]));
    let stage = SkillAnalystStage::new(langchain(&model), catalog());
    let local = SkillAnalystStage::new(StageBackend::Structured, catalog());

    let extraction = stage.execute(&skills_input(SENIOR_RESUME)).expect("extracts");

    assert_eq!(extraction, local.extract_locally(SENIOR_RESUME));
    assert_eq!(model.prompts().len(), 1);
}

#[test]
fn failing_model_falls_back_to_local_rules() {
    let model = Arc::new(ScriptedModel::failing());
    let stage = GapDetectorStage::new(StageBackend::CrewAi(model.clone()));

    let report = stage.execute(&gap_input()).expect("detects gaps");

    assert_eq!(report.critical_gaps, gap_input().required_stack);
    assert!(report.matched.is_empty());
    assert!(model.prompts()[0].contains("Role: gap analyst"));
}

#[test]
fn model_gap_answer_is_reconciled_against_required_stack() {
    let model = Arc::new(ScriptedModel::replying([
        r#"{"skills_coincidentes": ["python", "docker", "kafka"], "brechas_criticas": ["Terraform"]}"#,
    ]));
    let stage = GapDetectorStage::new(langchain(&model));

    let report = stage.execute(&gap_input()).expect("detects gaps");

    assert_eq!(report.matched, vec!["Python".to_string(), "Docker".to_string()]);
    assert_eq!(report.critical_gaps, vec!["AWS".to_string()]);
    assert!(report.soft_skill_gaps.is_empty());
}

#[test]
fn model_gap_list_alone_is_enough() {
    let model = Arc::new(ScriptedModel::replying([r#"{"brechas_criticas": ["aws"]}"#]));
    let stage = GapDetectorStage::new(langchain(&model));

    let report = stage.execute(&gap_input()).expect("detects gaps");

    assert_eq!(report.critical_gaps, vec!["AWS".to_string()]);
    assert_eq!(report.matched.len(), 2);
}

#[test]
fn model_seniority_answer_is_normalized() {
    let model = Arc::new(ScriptedModel::replying([
        r#"{"seniority_estimado": "Senior", "experiencia_detectada": 6, "fundamento": "Six years leading backend teams", "coherente": true}"#,
    ]));
    let stage = SeniorityEvaluatorStage::new(langchain(&model), EstimationMode::Composite);
    let input = SeniorityInput {
        resume_text: SENIOR_RESUME.to_string(),
        requested_level: SeniorityLevel::Staff,
        minimum_years: 7,
        years_experience: 8,
        skills: skill_set(&[(SkillCategory::Languages, "python")]),
    };

    let estimate = stage.execute(&input).expect("estimates");

    assert_eq!(estimate.level, SeniorityLevel::Senior);
    assert_eq!(estimate.years_experience, 6);
    assert!(estimate.coherent);
    assert_eq!(estimate.rationale, "Six years leading backend teams");
    assert!(model.prompts()[0].contains("Minimum experience: 7 years"));
}

#[test]
fn model_match_answer_is_clamped() {
    let model = Arc::new(ScriptedModel::replying([
        r#"{"porcentaje_match": 140, "match_tecnico": 90, "clasificacion": "excelente"}"#,
    ]));
    let stage = MatchCalculatorStage::new(langchain(&model), ScoringConfig::default());

    let result = stage.execute(&match_input()).expect("scores");

    assert_eq!(result.match_percentage, 100.0);
    assert_eq!(result.technical_match, 90.0);
    assert_eq!(result.seniority_match, 100.0);
    assert_eq!(result.classification, MatchClassification::Excellent);
}

#[test]
fn crew_backend_always_scores_locally() {
    let model = Arc::new(ScriptedModel::replying([r#"{"porcentaje_match": 5}"#]));
    let stage = MatchCalculatorStage::new(StageBackend::CrewAi(model.clone()), ScoringConfig::default());
    let input = match_input();

    let result = stage.execute(&input).expect("scores");

    let expected = MatchScorer::default().score(
        &input.matched_skills,
        &input.required_stack,
        input.estimated_level,
        input.requested_level,
        &input.critical_gaps,
    );
    assert_eq!(result, expected);
    assert!(model.prompts().is_empty());
}
