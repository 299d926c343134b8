mod catalog;
mod extract;

pub use catalog::{CatalogError, SkillCatalog};
pub use extract::{extract_years, SkillExtractor};

/// Whether `term` occurs in `text` as a whole token. Edges of `term` that are letters or
/// digits must not touch another letter or digit, so "r" is not found in "docker" while
/// ".net" is still found in "asp.net". Both inputs are expected lowercased.
pub(crate) fn contains_term(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    let starts_word = term.chars().next().is_some_and(char::is_alphanumeric);
    let ends_word = term.chars().next_back().is_some_and(char::is_alphanumeric);

    text.match_indices(term).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + term.len()..].chars().next();
        (!starts_word || !before.is_some_and(char::is_alphanumeric))
            && (!ends_word || !after.is_some_and(char::is_alphanumeric))
    })
}

/// Case-insensitive, bidirectional substring matcher.
///
/// A required skill matches a candidate skill when either string contains the other, so
/// "React" matches "react native" and the reverse. Blank strings never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillMatcher;

impl SkillMatcher {
    pub fn matches<S: AsRef<str>>(required: &str, candidates: &[S]) -> bool {
        Self::find_match(required, candidates).is_some()
    }

    /// First candidate matching `required`, if any.
    pub fn find_match<'a, S: AsRef<str>>(required: &str, candidates: &'a [S]) -> Option<&'a str> {
        let required = required.trim().to_lowercase();
        if required.is_empty() {
            return None;
        }

        candidates
            .iter()
            .map(|candidate| candidate.as_ref())
            .find(|candidate: &&str| {
                let candidate = candidate.trim().to_lowercase();
                !candidate.is_empty()
                    && (candidate.contains(&required) || required.contains(&candidate))
            })
    }
}
