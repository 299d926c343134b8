use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::super::domain::SkillSet;
use super::catalog::SkillCatalog;
use super::contains_term;

/// Scans résumé text for catalog skills and stated years of experience.
#[derive(Debug, Clone)]
pub struct SkillExtractor {
    catalog: Arc<SkillCatalog>,
}

impl SkillExtractor {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    /// Records every catalog skill that appears as a whole token of the lowercased text,
    /// in catalog order.
    pub fn extract(&self, resume_text: &str) -> SkillSet {
        let haystack = resume_text.to_lowercase();
        let mut skills = SkillSet::new();

        for (category, entries) in self.catalog.tables() {
            for skill in entries {
                if contains_term(&haystack, skill) {
                    skills.insert(category, skill);
                }
            }
        }

        skills
    }
}

fn experience_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)(\d+)\+?\s*a(?:ñ|n)os?\s+de\s+experiencia",
            r"(?i)(\d+)\+?\s*years?\s+(?:of\s+)?experience",
            r"(?i)experiencia:\s*(\d+)\s*a(?:ñ|n)os?",
            r"(?i)experience:\s*(\d+)\+?\s*years?",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("invalid experience regex"))
        .collect()
    })
}

/// Years of experience stated in the text, or 0 when none is found. Patterns are tried
/// in order and the first match wins.
pub fn extract_years(resume_text: &str) -> u32 {
    experience_patterns()
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(resume_text)
                .and_then(|captures| captures.get(1))
                .and_then(|years| years.as_str().parse::<u32>().ok())
        })
        .unwrap_or(0)
}
