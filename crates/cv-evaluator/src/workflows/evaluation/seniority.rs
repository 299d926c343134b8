use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{SeniorityLevel, SkillCategory, SkillSet};
use super::ladder::SeniorityLadder;

/// Which rule set produces the local seniority estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMode {
    /// Experience, title cues and skill complexity, averaged.
    #[default]
    Composite,
    /// Years of experience alone, coherence measured against the requested level.
    ExperienceOnly,
}

impl EstimationMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "composite" => Some(Self::Composite),
            "experience_only" | "experience" => Some(Self::ExperienceOnly),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Composite => "composite",
            Self::ExperienceOnly => "experience_only",
        }
    }
}

/// The three independent guesses the composite mode averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubEstimates {
    pub by_experience: SeniorityLevel,
    pub by_title: SeniorityLevel,
    pub by_skills: SeniorityLevel,
    pub average_rank: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeniorityEstimate {
    pub level: SeniorityLevel,
    pub coherent: bool,
    pub rationale: String,
    pub years_experience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_estimates: Option<SubEstimates>,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub coherence_note: String,
}

impl Default for SeniorityEstimate {
    fn default() -> Self {
        Self {
            level: SeniorityLadder::FALLBACK,
            coherent: false,
            rationale: "seniority could not be estimated".to_string(),
            years_experience: 0,
            sub_estimates: None,
            indicators: Vec::new(),
            coherence_note: String::new(),
        }
    }
}

const TITLE_CUES: [(SeniorityLevel, &[&str]); 5] = [
    (
        SeniorityLevel::Junior,
        &["junior", "entry", "trainee", "practicante", "estudiante"],
    ),
    (
        SeniorityLevel::SemiSenior,
        &["semi senior", "semi-senior", "mid-level", "intermedio"],
    ),
    (
        SeniorityLevel::Senior,
        &["senior", "sr", "lead", "arquitecto", "principal"],
    ),
    (
        SeniorityLevel::Staff,
        &["staff", "principal engineer", "tech lead"],
    ),
    (
        SeniorityLevel::Principal,
        &["principal", "distinguished", "fellow", "cto", "vp engineering"],
    ),
];

const INDICATOR_CUES: [(&str, &[&str]); 3] = [
    ("senior", &["senior", "sr"]),
    ("lead", &["lead", "arquitecto"]),
    ("staff", &["principal", "staff"]),
];

// Expected experience window per level, upper bound inclusive.
const YEAR_RANGES: [(SeniorityLevel, u32, u32); 5] = [
    (SeniorityLevel::Junior, 0, 2),
    (SeniorityLevel::SemiSenior, 2, 4),
    (SeniorityLevel::Senior, 4, 7),
    (SeniorityLevel::Staff, 7, 10),
    (SeniorityLevel::Principal, 10, u32::MAX),
];

/// Rule-based seniority estimation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeniorityEstimator {
    mode: EstimationMode,
}

impl SeniorityEstimator {
    pub fn new(mode: EstimationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> EstimationMode {
        self.mode
    }

    /// Runs the configured mode. `requested` is only consulted by the experience-only mode.
    pub fn estimate(
        &self,
        years_experience: u32,
        resume_text: &str,
        skills: &SkillSet,
        requested: SeniorityLevel,
    ) -> SeniorityEstimate {
        match self.mode {
            EstimationMode::Composite => self.composite(years_experience, resume_text, skills),
            EstimationMode::ExperienceOnly => {
                self.from_experience(years_experience, resume_text, skills, requested)
            }
        }
    }

    pub fn composite(
        &self,
        years_experience: u32,
        resume_text: &str,
        skills: &SkillSet,
    ) -> SeniorityEstimate {
        let by_experience = level_for_years(years_experience);
        let by_title = level_from_titles(resume_text);
        let by_skills = level_from_skills(skills);
        let (level, average_rank) = consolidate(&[by_experience, by_title, by_skills]);
        let (_, coherence_note) = coherence_report(level, years_experience, skills.total());

        SeniorityEstimate {
            level,
            coherent: is_coherent(level, years_experience),
            rationale: format!(
                "{level} candidate with {years_experience} years of experience. Handles {} detected technical skills.",
                skills.total()
            ),
            years_experience,
            sub_estimates: Some(SubEstimates {
                by_experience,
                by_title,
                by_skills,
                average_rank,
            }),
            indicators: title_indicators(resume_text),
            coherence_note,
        }
    }

    pub fn from_experience(
        &self,
        years_experience: u32,
        resume_text: &str,
        skills: &SkillSet,
        requested: SeniorityLevel,
    ) -> SeniorityEstimate {
        let level = level_for_years(years_experience);
        let (_, coherence_note) = coherence_report(level, years_experience, skills.total());

        SeniorityEstimate {
            level,
            coherent: SeniorityLadder::distance(level, requested) <= 1,
            rationale: format!("Based on {years_experience} years of experience"),
            years_experience,
            sub_estimates: None,
            indicators: title_indicators(resume_text),
            coherence_note,
        }
    }
}

pub fn level_for_years(years: u32) -> SeniorityLevel {
    match years {
        0..=2 => SeniorityLevel::Junior,
        3..=4 => SeniorityLevel::SemiSenior,
        5..=7 => SeniorityLevel::Senior,
        8..=10 => SeniorityLevel::Staff,
        _ => SeniorityLevel::Principal,
    }
}

// Cue phrases only count as whole words, so "cto" does not fire inside "vector".
fn phrase_pattern(cues: &[&str]) -> Regex {
    let alternatives = cues
        .iter()
        .map(|cue| regex::escape(cue))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")).expect("invalid title cue pattern")
}

fn title_patterns() -> &'static [(SeniorityLevel, Regex)] {
    static PATTERNS: OnceLock<Vec<(SeniorityLevel, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        TITLE_CUES
            .iter()
            .map(|(level, cues)| (*level, phrase_pattern(cues)))
            .collect()
    })
}

fn indicator_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        INDICATOR_CUES
            .iter()
            .map(|(indicator, cues)| (*indicator, phrase_pattern(cues)))
            .collect()
    })
}

/// Highest level whose title cues appear in the text; junior when none do.
pub fn level_from_titles(resume_text: &str) -> SeniorityLevel {
    title_patterns()
        .iter()
        .filter(|(_, pattern)| pattern.is_match(resume_text))
        .map(|(level, _)| *level)
        .max()
        .unwrap_or(SeniorityLevel::Junior)
}

pub fn level_from_skills(skills: &SkillSet) -> SeniorityLevel {
    let total = skills.total();
    let cloud = skills.count(SkillCategory::CloudDevops);
    let frameworks = skills.framework_count();

    if total >= 15 && cloud >= 3 {
        SeniorityLevel::Senior
    } else if total >= 10 && frameworks >= 2 {
        SeniorityLevel::SemiSenior
    } else {
        SeniorityLevel::Junior
    }
}

/// Lowest level whose rank reaches the unrounded mean rank of `levels`.
pub fn consolidate(levels: &[SeniorityLevel]) -> (SeniorityLevel, f64) {
    if levels.is_empty() {
        return (SeniorityLevel::Junior, 0.0);
    }

    let average = levels.iter().map(|level| f64::from(level.rank())).sum::<f64>()
        / levels.len() as f64;
    let level = SeniorityLevel::ordered()
        .into_iter()
        .find(|level| f64::from(level.rank()) >= average)
        .unwrap_or(SeniorityLevel::Principal);

    (level, average)
}

pub fn is_coherent(level: SeniorityLevel, years_experience: u32) -> bool {
    match level {
        SeniorityLevel::Junior => years_experience <= 3,
        SeniorityLevel::Staff | SeniorityLevel::Principal => years_experience >= 5,
        _ => true,
    }
}

/// Table-driven coherence check against each level's expected experience window and
/// skill breadth. Returns the verdict and a human-readable reason.
pub fn coherence_report(
    level: SeniorityLevel,
    years_experience: u32,
    skill_count: usize,
) -> (bool, String) {
    let (min_years, max_years) = YEAR_RANGES
        .iter()
        .find(|(candidate, _, _)| *candidate == level)
        .map(|(_, min, max)| (*min, *max))
        .unwrap_or((0, u32::MAX));

    if years_experience < min_years {
        return (
            false,
            format!("{years_experience} years is below the {min_years} expected for {level}"),
        );
    }
    if years_experience > max_years {
        return (
            false,
            format!("{years_experience} years is above the {max_years} expected for {level}"),
        );
    }
    if level == SeniorityLevel::Junior && skill_count > 15 {
        return (false, "advanced skill breadth for a junior level".to_string());
    }
    if matches!(level, SeniorityLevel::Staff | SeniorityLevel::Principal) && skill_count < 10 {
        return (
            false,
            "skill breadth too narrow for staff/principal".to_string(),
        );
    }

    (true, "coherent".to_string())
}

/// Coarse role indicators mentioned in the text.
pub fn title_indicators(resume_text: &str) -> Vec<String> {
    indicator_patterns()
        .iter()
        .filter(|(_, pattern)| pattern.is_match(resume_text))
        .map(|(indicator, _)| indicator.to_string())
        .collect()
}
