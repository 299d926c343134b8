use crate::workflows::evaluation::domain::SeniorityLevel;
use crate::workflows::evaluation::scoring::{
    MatchClassification, MatchResult, MatchScorer, PenaltyPolicy, ScoringConfig,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn empty_stack_is_a_full_technical_match() {
    let result = MatchScorer::default().score(
        &strings(&["python"]),
        &[],
        SeniorityLevel::Senior,
        SeniorityLevel::Senior,
        &[],
    );
    assert_eq!(result.technical_match, 100.0);
    assert_eq!(result.match_percentage, 100.0);
    assert_eq!(result.classification, MatchClassification::Excellent);
}

#[test]
fn classification_follows_the_reported_percentage() {
    let required: Vec<String> = (0..55).map(|index| format!("skill-{index}")).collect();
    let matched = required[..51].to_vec();
    let gaps = required[51..].to_vec();

    let result = MatchScorer::default().score(
        &matched,
        &required,
        SeniorityLevel::Junior,
        SeniorityLevel::Senior,
        &gaps,
    );

    assert_eq!(result.seniority_match, 50.0);
    assert_eq!(result.match_percentage, 40.0);
    assert_eq!(result.classification, MatchClassification::Fair);
}

#[test]
fn tiered_penalty_for_two_gaps() {
    let adjusted = PenaltyPolicy::Tiered.apply(90.0, 2);
    assert!((adjusted - 76.5).abs() < 1e-9);
    assert_eq!(
        PenaltyPolicy::Tiered.classify(adjusted),
        MatchClassification::Good
    );
}

#[test]
fn additive_penalty_is_capped_and_has_no_low_band() {
    assert_eq!(PenaltyPolicy::Additive.apply(90.0, 2), 70.0);
    assert_eq!(PenaltyPolicy::Additive.apply(90.0, 7), 40.0);
    assert_eq!(
        PenaltyPolicy::Additive.classify(25.0),
        MatchClassification::NotRecommended
    );
    assert_eq!(PenaltyPolicy::Tiered.classify(25.0), MatchClassification::Low);
}

#[test]
fn penalized_scores_stay_within_bounds() {
    for policy in [PenaltyPolicy::Tiered, PenaltyPolicy::Additive] {
        for gaps in 0..8 {
            for base in [-20.0, 0.0, 35.5, 100.0, 180.0] {
                let adjusted = policy.apply(base, gaps);
                assert!((0.0..=100.0).contains(&adjusted), "{policy:?} {base} {gaps}");
            }
        }
    }
}

#[test]
fn weighted_score_with_one_gap() {
    let result = MatchScorer::default().score(
        &strings(&["Python", "Docker"]),
        &strings(&["Python", "AWS", "Docker"]),
        SeniorityLevel::Senior,
        SeniorityLevel::Senior,
        &strings(&["AWS"]),
    );

    assert_eq!(result.technical_match, 66.7);
    assert_eq!(result.seniority_match, 100.0);
    assert_eq!(result.match_percentage, 72.8);
    assert_eq!(result.classification, MatchClassification::Good);
    assert!(result.summary.starts_with("Match total: 72.8%"));
    assert!(result.summary.contains("Gaps: AWS."));
}

#[test]
fn additive_scorer_uses_its_own_penalty() {
    let scorer = MatchScorer::new(ScoringConfig::with_penalty(PenaltyPolicy::Additive));
    let result = scorer.score(
        &strings(&["Python"]),
        &strings(&["Python", "AWS"]),
        SeniorityLevel::SemiSenior,
        SeniorityLevel::Senior,
        &strings(&["AWS"]),
    );

    // 50 * 0.7 + 75 * 0.3 - 10
    assert_eq!(result.match_percentage, 47.5);
    assert_eq!(result.classification, MatchClassification::Fair);
}

#[test]
fn match_result_survives_a_json_round_trip() {
    let result = MatchScorer::default().score(
        &strings(&["Rust"]),
        &strings(&["Rust", "Kafka"]),
        SeniorityLevel::Staff,
        SeniorityLevel::Senior,
        &strings(&["Kafka"]),
    );

    let encoded = serde_json::to_string(&result).expect("serializes");
    let decoded: MatchResult = serde_json::from_str(&encoded).expect("deserializes");
    assert_eq!(decoded, result);
}

#[test]
fn classification_wire_names() {
    let encoded = serde_json::to_value(MatchClassification::NotRecommended).expect("serializes");
    assert_eq!(encoded, serde_json::json!("no_recomendado"));
    assert_eq!(
        MatchClassification::parse("No Recomendado"),
        Some(MatchClassification::NotRecommended)
    );
    assert_eq!(MatchClassification::parse("great"), None);
}
