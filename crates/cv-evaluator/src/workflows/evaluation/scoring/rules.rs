use super::policy::MatchClassification;

/// Share of the required stack covered by `matched_count`, capped at 100.
///
/// This is a length ratio: callers pass the already-matched skills, not the raw candidate
/// list. An empty stack is a full match.
pub(crate) fn technical_match(matched_count: usize, required_count: usize) -> f64 {
    if required_count == 0 {
        return 100.0;
    }
    (100.0 * matched_count as f64 / required_count as f64).min(100.0)
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn summarize(
    final_match: f64,
    technical: f64,
    seniority: f64,
    critical_gaps: &[String],
    classification: MatchClassification,
) -> String {
    let mut summary = format!(
        "Match total: {final_match:.1}% (technical: {technical:.1}%, seniority: {seniority:.1}%). "
    );

    if !critical_gaps.is_empty() {
        let listed = critical_gaps
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        summary.push_str(&format!("Gaps: {listed}. "));
    }

    summary.push_str(classification.verdict());
    summary
}
