use cv_evaluator::config::EvaluatorConfig;
use cv_evaluator::error::AppError;
use cv_evaluator::workflows::evaluation::{
    EstimationMode, EvaluationMethod, EvaluatorSettings, LanguageModel, PenaltyPolicy,
    UnavailableModel,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) method: EvaluationMethod,
}

pub(crate) fn evaluator_settings(config: &EvaluatorConfig) -> Result<EvaluatorSettings, AppError> {
    let settings = EvaluatorSettings::from_config(config)?;
    info!(
        method = settings.method.label(),
        penalty = settings.scoring.penalty.label(),
        seniority_mode = settings.seniority_mode.label(),
        catalog_skills = settings.catalog.len(),
        "evaluator configured"
    );
    Ok(settings)
}

/// The service bundles no model transport, so model-backed methods run their local rules.
pub(crate) fn language_model(config: &EvaluatorConfig) -> Arc<dyn LanguageModel> {
    if config.method != EvaluationMethod::Structured {
        warn!(
            method = config.method.label(),
            model = config.model.as_deref().unwrap_or("none"),
            "no language model transport available, stages will use local rules"
        );
    }
    Arc::new(UnavailableModel)
}

/// Splits a comma separated list, dropping blank entries.
pub(crate) fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn parse_method(raw: &str) -> Result<EvaluationMethod, String> {
    EvaluationMethod::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not one of estructurado, langchain, crew_ai"))
}

pub(crate) fn parse_policy(raw: &str) -> Result<PenaltyPolicy, String> {
    PenaltyPolicy::parse(raw).ok_or_else(|| format!("'{raw}' is not one of tiered, additive"))
}

pub(crate) fn parse_seniority_mode(raw: &str) -> Result<EstimationMode, String> {
    EstimationMode::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not one of composite, experience_only"))
}
