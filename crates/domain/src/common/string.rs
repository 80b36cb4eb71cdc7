//! Keyword tokenization and term matching.

use std::collections::BTreeSet;

/// Splits text into a set of lowercase keyword terms.
///
/// Terms are maximal runs of alphanumeric characters (underscores split too,
/// so `play_card` yields `play` and `card`). Single-character terms are dropped.
///
/// # Examples
///
/// ```
/// use gamemind_domain::common::tokenize;
///
/// let terms = tokenize("Play a CARD, then play_again!");
/// assert!(terms.contains("card"));
/// assert!(terms.contains("again"));
/// assert!(!terms.contains("a"));
/// ```
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() > 1)
        .map(str::to_lowercase)
        .collect()
}

/// Number of terms shared by two term sets.
pub fn term_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    if a.len() <= b.len() {
        a.iter().filter(|term| b.contains(*term)).count()
    } else {
        b.iter().filter(|term| a.contains(*term)).count()
    }
}

/// Case-insensitive substring check used for verb and name matching.
pub fn contains_term(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_dedups() {
        let terms = tokenize("Card card CARD game");
        assert_eq!(terms.len(), 2);
        assert!(terms.contains("card"));
        assert!(terms.contains("game"));
    }

    #[test]
    fn test_tokenize_splits_on_underscores() {
        let terms = tokenize("play_card");
        assert!(terms.contains("play"));
        assert!(terms.contains("card"));
    }

    #[test]
    fn test_term_overlap() {
        let a = tokenize("the card game");
        let b = tokenize("a card trick in the dark");
        assert_eq!(term_overlap(&a, &b), 2);
    }

    #[test]
    fn test_contains_term_is_case_insensitive() {
        assert!(contains_term("Attack the Goblin", "attack"));
        assert!(!contains_term("defend", "attack"));
        assert!(!contains_term("anything", ""));
    }
}
