use serde::{Deserialize, Serialize};

use super::domain::SkillSet;
use super::skills::SkillMatcher;

/// Candidates with more critical gaps than this are not considered viable.
pub const MAX_VIABLE_GAPS: usize = 2;

/// Coarse severity bucket derived from the share of required skills that are missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    #[default]
    Low,
    Medium,
    High,
}

impl Criticality {
    pub fn from_counts(gaps: usize, required: usize) -> Self {
        if gaps == 0 {
            return Self::Low;
        }

        let ratio = gaps as f64 / required.max(1) as f64;
        if ratio > 0.5 {
            Self::High
        } else if ratio > 0.25 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Missing and matching skills for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapReport {
    pub critical_gaps: Vec<String>,
    pub soft_skill_gaps: Vec<String>,
    pub matched: Vec<String>,
    pub criticality: Criticality,
    pub viable: bool,
    pub recommendation: String,
}

/// Splits `required` into (matched, missing), preserving the required order and the
/// caller's spelling.
pub fn partition<R, C>(required: &[R], candidates: &[C]) -> (Vec<String>, Vec<String>)
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for skill in required {
        let skill = skill.as_ref();
        if SkillMatcher::matches(skill, candidates) {
            matched.push(skill.to_string());
        } else {
            missing.push(skill.to_string());
        }
    }

    (matched, missing)
}

/// Compares required skills against a candidate's skill set.
#[derive(Debug, Clone, Copy, Default)]
pub struct GapAnalyzer;

impl GapAnalyzer {
    /// Technical skills are matched against every category; soft skills only against the
    /// candidate's soft-skill category.
    pub fn analyze(
        &self,
        required_stack: &[String],
        required_soft_skills: &[String],
        candidate: &SkillSet,
    ) -> GapReport {
        let flattened = candidate.flatten();
        let (matched, critical_gaps) = partition(required_stack, &flattened);
        let (_, soft_skill_gaps) = partition(required_soft_skills, candidate.soft_skills());

        Self::report(required_stack.len(), matched, critical_gaps, soft_skill_gaps)
    }

    /// Derives criticality, viability and the recommendation from an existing split.
    pub fn report(
        required_count: usize,
        matched: Vec<String>,
        critical_gaps: Vec<String>,
        soft_skill_gaps: Vec<String>,
    ) -> GapReport {
        let criticality = Criticality::from_counts(critical_gaps.len(), required_count);
        let viable = critical_gaps.len() <= MAX_VIABLE_GAPS;
        let recommendation = recommendation(&critical_gaps, criticality);

        GapReport {
            critical_gaps,
            soft_skill_gaps,
            matched,
            criticality,
            viable,
            recommendation,
        }
    }
}

fn recommendation(gaps: &[String], criticality: Criticality) -> String {
    if gaps.is_empty() {
        return "Candidate meets every technical requirement.".to_string();
    }

    let listed = |limit: usize| {
        gaps.iter()
            .take(limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    match criticality {
        Criticality::High => format!("Significant gaps: {}. Not advised to proceed.", listed(3)),
        Criticality::Medium => format!(
            "Moderate gaps detected: {}. Consider for a more junior opening.",
            listed(2)
        ),
        Criticality::Low => format!(
            "Minor gaps: {}. Viable candidate with training.",
            listed(gaps.len())
        ),
    }
}
