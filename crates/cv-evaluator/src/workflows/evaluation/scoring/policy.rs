use std::fmt;

use serde::{Deserialize, Serialize};

/// How the number of critical gaps reduces the weighted base score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyPolicy {
    /// Multiplier per gap count: 1.00, 0.95, 0.85, 0.70, then 0.50 from four gaps.
    #[default]
    Tiered,
    /// Ten points per gap, capped at fifty.
    Additive,
}

impl PenaltyPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tiered" | "multiplier" => Some(Self::Tiered),
            "additive" | "subtractive" => Some(Self::Additive),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tiered => "tiered",
            Self::Additive => "additive",
        }
    }

    /// Applies the penalty and clamps the outcome to [0, 100].
    pub fn apply(self, base: f64, gap_count: usize) -> f64 {
        let adjusted = match self {
            Self::Tiered => base * tier_multiplier(gap_count),
            Self::Additive => base - (gap_count.min(5) as f64 * 10.0),
        };
        adjusted.clamp(0.0, 100.0)
    }

    /// Classification thresholds. The additive policy has no `bajo` band.
    pub fn classify(self, percentage: f64) -> MatchClassification {
        if percentage >= 80.0 {
            MatchClassification::Excellent
        } else if percentage >= 60.0 {
            MatchClassification::Good
        } else if percentage >= 40.0 {
            MatchClassification::Fair
        } else if percentage >= 20.0 && self == Self::Tiered {
            MatchClassification::Low
        } else {
            MatchClassification::NotRecommended
        }
    }
}

fn tier_multiplier(gap_count: usize) -> f64 {
    match gap_count {
        0 => 1.0,
        1 => 0.95,
        2 => 0.85,
        3 => 0.70,
        _ => 0.50,
    }
}

/// Final verdict band for a match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchClassification {
    #[serde(rename = "excelente")]
    Excellent,
    #[serde(rename = "bueno")]
    Good,
    #[serde(rename = "regular")]
    Fair,
    #[serde(rename = "bajo")]
    Low,
    #[serde(rename = "no_recomendado")]
    NotRecommended,
}

impl MatchClassification {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excelente",
            Self::Good => "bueno",
            Self::Fair => "regular",
            Self::Low => "bajo",
            Self::NotRecommended => "no_recomendado",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        [
            Self::Excellent,
            Self::Good,
            Self::Fair,
            Self::Low,
            Self::NotRecommended,
        ]
        .into_iter()
        .find(|classification| classification.label() == normalized)
    }

    pub const fn verdict(self) -> &'static str {
        match self {
            Self::Excellent => "Strongly recommended for the role.",
            Self::Good => "Recommended; weigh the minor gaps.",
            Self::Fair => "Partially suitable; needs further assessment.",
            Self::Low | Self::NotRecommended => "Not recommended for the requested role.",
        }
    }
}

impl Default for MatchClassification {
    fn default() -> Self {
        Self::NotRecommended
    }
}

impl fmt::Display for MatchClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
