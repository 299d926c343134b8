use super::domain::SeniorityLevel;

/// Ranking and compatibility rules between seniority levels.
pub struct SeniorityLadder;

impl SeniorityLadder {
    /// Level assumed when a label cannot be recognized.
    pub const FALLBACK: SeniorityLevel = SeniorityLevel::SemiSenior;

    pub fn distance(a: SeniorityLevel, b: SeniorityLevel) -> u8 {
        a.rank().abs_diff(b.rank())
    }

    /// Percentage compatibility between a requested and an estimated level.
    pub fn compatibility(requested: SeniorityLevel, estimated: SeniorityLevel) -> f64 {
        match Self::distance(requested, estimated) {
            0 => 100.0,
            1 => 75.0,
            2 => 50.0,
            _ => 25.0,
        }
    }

    /// Exact, case-insensitive match on a canonical label.
    pub fn parse(raw: &str) -> Option<SeniorityLevel> {
        let candidate = canonical_form(raw);
        SeniorityLevel::ordered()
            .into_iter()
            .find(|level| level.label() == candidate)
    }

    /// Maps free text onto a level: exact label first, then containment in either
    /// direction in ladder order, falling back to [`Self::FALLBACK`].
    pub fn normalize(raw: &str) -> SeniorityLevel {
        if let Some(level) = Self::parse(raw) {
            return level;
        }

        let candidate = canonical_form(raw);
        if candidate.is_empty() {
            return Self::FALLBACK;
        }

        SeniorityLevel::ordered()
            .into_iter()
            .find(|level| candidate.contains(level.label()) || level.label().contains(&candidate))
            .unwrap_or(Self::FALLBACK)
    }
}

fn canonical_form(raw: &str) -> String {
    raw.trim().to_lowercase().replace(['_', ' '], "-")
}
