//! Outstanding questions produced by the Validator (spec.md §3, §4.6, §9).

use std::collections::BTreeSet;

/// An ordered list of free-text questions, produced by the Validator.
/// Treated as a set for progress comparison (spec.md §3).
pub type MissingQuestions = Vec<String>;

/// Normalize a question for set-equality comparison: lower-cased,
/// trimmed, with trailing/leading punctuation stripped (spec.md §9
/// "progress detection by question-set equality"). This is the floor the
/// spec calls out as conservative — semantic equivalence would do
/// better, but that is left as an open question (see DESIGN.md).
pub fn normalize_question(q: &str) -> String {
    q.trim()
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a full list of questions into a comparable set.
pub fn normalized_set(questions: &[String]) -> BTreeSet<String> {
    questions.iter().map(|q| normalize_question(q)).collect()
}

/// Whether `after` represents no progress relative to `before`: the
/// normalized sets are identical (spec.md §4.6). Progress requires at
/// least one question's normalized text to disappear.
pub fn no_progress(before: &[String], after: &[String]) -> bool {
    normalized_set(before) == normalized_set(after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_and_punctuation() {
        assert_eq!(
            normalize_question("What are the Brand Colours?"),
            "what are the brand colours"
        );
    }

    #[test]
    fn identical_sets_are_no_progress() {
        let before = vec!["What colours?".to_string(), "What fonts?".to_string()];
        let after = vec!["what fonts".to_string(), "what colours".to_string()];
        assert!(no_progress(&before, &after));
    }

    #[test]
    fn paraphrase_that_preserves_set_is_no_progress() {
        let before = vec!["What are the brand colours?".to_string()];
        let after = vec!["what are the brand colours".to_string()];
        assert!(no_progress(&before, &after));
    }

    #[test]
    fn removed_question_is_progress() {
        let before = vec!["What colours?".to_string(), "What fonts?".to_string()];
        let after = vec!["What fonts?".to_string()];
        assert!(!no_progress(&before, &after));
    }
}
