use std::sync::Arc;

use tracing::info;

use crate::config::EvaluatorConfig;

use super::domain::EvaluationMethod;
use super::scoring::ScoringConfig;
use super::seniority::EstimationMode;
use super::skills::{CatalogError, SkillCatalog};

/// Immutable knobs shared by every coordinator built from them.
#[derive(Debug, Clone)]
pub struct EvaluatorSettings {
    pub method: EvaluationMethod,
    pub scoring: ScoringConfig,
    pub seniority_mode: EstimationMode,
    pub include_trace: bool,
    pub catalog: Arc<SkillCatalog>,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            method: EvaluationMethod::default(),
            scoring: ScoringConfig::default(),
            seniority_mode: EstimationMode::default(),
            include_trace: false,
            catalog: Arc::new(SkillCatalog::builtin()),
        }
    }
}

impl EvaluatorSettings {
    /// Builds settings from loaded configuration, reading the skill CSV when one is set.
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.skills_csv {
            Some(path) => {
                let catalog = SkillCatalog::from_path(path)?;
                info!(
                    path = %path.display(),
                    skills = catalog.len(),
                    "loaded skill catalog"
                );
                catalog
            }
            None => SkillCatalog::builtin(),
        };

        Ok(Self {
            method: config.method,
            scoring: ScoringConfig::with_penalty(config.penalty_policy),
            seniority_mode: config.seniority_mode,
            include_trace: config.include_trace,
            catalog: Arc::new(catalog),
        })
    }

    pub fn with_method(mut self, method: EvaluationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_catalog(mut self, catalog: SkillCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }
}
