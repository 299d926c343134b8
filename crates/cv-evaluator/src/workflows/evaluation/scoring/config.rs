use serde::{Deserialize, Serialize};

use super::policy::PenaltyPolicy;

/// Weights and gap policy applied by the match scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub technical_weight: f64,
    pub seniority_weight: f64,
    pub penalty: PenaltyPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            technical_weight: 0.70,
            seniority_weight: 0.30,
            penalty: PenaltyPolicy::default(),
        }
    }
}

impl ScoringConfig {
    pub fn with_penalty(penalty: PenaltyPolicy) -> Self {
        Self {
            penalty,
            ..Self::default()
        }
    }
}
