// src/services/keywords.rs

//! Keyword extraction for English article bodies.

use std::collections::HashSet;

use crate::models::{Vocabulary, WHITESPACE};

/// Only articles in this language contribute keywords.
pub const KEYWORD_LANGUAGE: &str = "english";

/// Extract the distinct keywords of `text`.
///
/// Tokens are split on ASCII [`WHITESPACE`], lower-cased and stripped of every
/// character outside `a-z`. Empty tokens and linking words are dropped.
pub fn extract_keywords(text: &str, vocabulary: &Vocabulary) -> HashSet<String> {
    text.split(WHITESPACE)
        .map(|token| {
            token
                .to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .filter(|word| !vocabulary.is_linking_word(word))
        .collect()
}
