mod config;
mod policy;
mod rules;

pub use config::ScoringConfig;
pub use policy::{MatchClassification, PenaltyPolicy};

use serde::{Deserialize, Serialize};

use super::domain::SeniorityLevel;
use super::ladder::SeniorityLadder;

pub(crate) use rules::round_one_decimal;

/// Stateless scorer combining technical coverage, seniority fit and a gap penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScorer {
    config: ScoringConfig,
}

impl MatchScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// `matched_skills` is expected to hold only the required skills the candidate covers.
    pub fn score(
        &self,
        matched_skills: &[String],
        required_stack: &[String],
        estimated_level: SeniorityLevel,
        requested_level: SeniorityLevel,
        critical_gaps: &[String],
    ) -> MatchResult {
        let technical = rules::technical_match(matched_skills.len(), required_stack.len());
        let seniority = SeniorityLadder::compatibility(requested_level, estimated_level);
        let base = technical * self.config.technical_weight + seniority * self.config.seniority_weight;
        // Classify the reported figure so the label never disagrees with it.
        let final_match = round_one_decimal(self.config.penalty.apply(base, critical_gaps.len()));
        let classification = self.config.penalty.classify(final_match);

        MatchResult {
            match_percentage: final_match,
            technical_match: round_one_decimal(technical),
            seniority_match: round_one_decimal(seniority),
            requested_level,
            estimated_level,
            classification,
            summary: rules::summarize(
                final_match,
                technical,
                seniority,
                critical_gaps,
                classification,
            ),
        }
    }

    /// Classification for an externally supplied percentage.
    pub fn classify(&self, percentage: f64) -> MatchClassification {
        self.config.penalty.classify(percentage)
    }
}

/// Scored outcome of one evaluation. Percentages carry one decimal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_percentage: f64,
    pub technical_match: f64,
    pub seniority_match: f64,
    pub requested_level: SeniorityLevel,
    pub estimated_level: SeniorityLevel,
    pub classification: MatchClassification,
    pub summary: String,
}
