use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered career-stage labels used for both requested and estimated seniority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SeniorityLevel {
    #[serde(rename = "junior")]
    Junior,
    #[default]
    #[serde(rename = "semi-senior")]
    SemiSenior,
    #[serde(rename = "senior")]
    Senior,
    #[serde(rename = "staff")]
    Staff,
    #[serde(rename = "principal")]
    Principal,
}

impl SeniorityLevel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Junior,
            Self::SemiSenior,
            Self::Senior,
            Self::Staff,
            Self::Principal,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::SemiSenior => "semi-senior",
            Self::Senior => "senior",
            Self::Staff => "staff",
            Self::Principal => "principal",
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::Junior => 0,
            Self::SemiSenior => 1,
            Self::Senior => 2,
            Self::Staff => 3,
            Self::Principal => 4,
        }
    }
}

impl fmt::Display for SeniorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets used to group extracted skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Languages,
    FrontendFrameworks,
    BackendFrameworks,
    MlAi,
    Databases,
    CloudDevops,
    Methodologies,
    SoftSkills,
    Other,
}

impl SkillCategory {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Languages,
            Self::FrontendFrameworks,
            Self::BackendFrameworks,
            Self::MlAi,
            Self::Databases,
            Self::CloudDevops,
            Self::Methodologies,
            Self::SoftSkills,
            Self::Other,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Languages => "languages",
            Self::FrontendFrameworks => "frontend_frameworks",
            Self::BackendFrameworks => "backend_frameworks",
            Self::MlAi => "ml_ai",
            Self::Databases => "databases",
            Self::CloudDevops => "cloud_devops",
            Self::Methodologies => "methodologies",
            Self::SoftSkills => "soft_skills",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Languages => "Programming languages",
            Self::FrontendFrameworks => "Frontend frameworks",
            Self::BackendFrameworks => "Backend frameworks",
            Self::MlAi => "Machine learning & AI",
            Self::Databases => "Databases",
            Self::CloudDevops => "Cloud & DevOps",
            Self::Methodologies => "Methodologies",
            Self::SoftSkills => "Soft skills",
            Self::Other => "Other",
        }
    }

    /// Parses a category key, accepting `-` or spaces in place of `_`.
    pub fn from_key(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ordered()
            .into_iter()
            .find(|category| category.key() == normalized)
    }
}

/// Candidate skills grouped by category. Entries are lowercase and trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet {
    categories: BTreeMap<SkillCategory, Vec<String>>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a skill to a category, ignoring blanks and duplicates within the category.
    pub fn insert(&mut self, category: SkillCategory, skill: &str) {
        let skill = skill.trim().to_lowercase();
        if skill.is_empty() {
            return;
        }

        let entries = self.categories.entry(category).or_default();
        if !entries.contains(&skill) {
            entries.push(skill);
        }
    }

    pub fn get(&self, category: SkillCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: SkillCategory) -> usize {
        self.get(category).len()
    }

    pub fn total(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn framework_count(&self) -> usize {
        self.count(SkillCategory::FrontendFrameworks) + self.count(SkillCategory::BackendFrameworks)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All skills across categories, in category order.
    pub fn flatten(&self) -> Vec<String> {
        self.categories.values().flatten().cloned().collect()
    }

    pub fn soft_skills(&self) -> &[String] {
        self.get(SkillCategory::SoftSkills)
    }
}

impl<S: AsRef<str>> FromIterator<(SkillCategory, S)> for SkillSet {
    fn from_iter<I: IntoIterator<Item = (SkillCategory, S)>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for (category, skill) in iter {
            set.insert(category, skill.as_ref());
        }
        set
    }
}

/// Job requirements a résumé is scored against. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    pub required_stack: Vec<String>,
    pub requested_level: SeniorityLevel,
    #[serde(default)]
    pub minimum_years: u32,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

impl Requirements {
    pub fn new<I, S>(required_stack: I, requested_level: SeniorityLevel) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_stack: required_stack.into_iter().map(Into::into).collect(),
            requested_level,
            minimum_years: 0,
            soft_skills: Vec::new(),
        }
    }

    pub fn with_minimum_years(mut self, years: u32) -> Self {
        self.minimum_years = years;
        self
    }

    pub fn with_soft_skills<I, S>(mut self, soft_skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.soft_skills = soft_skills.into_iter().map(Into::into).collect();
        self
    }
}

/// Which stage implementations the coordinator runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationMethod {
    /// Local keyword and rule based stages only.
    #[default]
    #[serde(rename = "estructurado")]
    Structured,
    /// Structured JSON prompts per stage, local rules as fallback.
    #[serde(rename = "langchain")]
    LangChain,
    /// Role-based specialist prompts for the analysis stages; scoring stays local.
    #[serde(rename = "crew_ai")]
    CrewAi,
}

impl EvaluationMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Structured => "estructurado",
            Self::LangChain => "langchain",
            Self::CrewAi => "crew_ai",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "estructurado" | "structured" => Some(Self::Structured),
            "langchain" => Some(Self::LangChain),
            "crew_ai" | "crewai" | "crew" => Some(Self::CrewAi),
            _ => None,
        }
    }
}

impl fmt::Display for EvaluationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
