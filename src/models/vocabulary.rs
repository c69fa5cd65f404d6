//! Accepted languages, accepted categories and linking words.
//!
//! Loaded once before ingestion and shared read-only by every worker.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// ASCII whitespace separators: space, tab, newline, vertical tab, form feed
/// and carriage return. Other Unicode spaces are ordinary characters.
pub const WHITESPACE: [char; 6] = [' ', '\t', '\n', '\x0B', '\x0C', '\r'];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\x0B\x0C\r]+").expect("static regex"));

/// Normalize a category name into its index key.
///
/// Commas are removed and every run of [`WHITESPACE`] becomes a single `_`.
/// Case is preserved.
pub fn normalize_category(name: &str) -> String {
    let without_commas = name.replace(',', "");
    WHITESPACE_RUN.replace_all(&without_commas, "_").into_owned()
}

/// The three vocabulary sets used during a run.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    languages: HashSet<String>,
    /// normalized key -> accepted spelling
    categories: HashMap<String, String>,
    linking_words: HashSet<String>,
}

impl Vocabulary {
    pub fn new(languages: Vec<String>, categories: Vec<String>, linking_words: Vec<String>) -> Self {
        let categories = categories
            .into_iter()
            .map(|name| (normalize_category(&name), name))
            .collect();

        Self {
            languages: languages.into_iter().collect(),
            categories,
            linking_words: linking_words.into_iter().collect(),
        }
    }

    /// Whether `language` is an accepted language.
    pub fn is_language(&self, language: &str) -> bool {
        self.languages.contains(language)
    }

    /// Whether `word` is a linking word excluded from keywords.
    pub fn is_linking_word(&self, word: &str) -> bool {
        self.linking_words.contains(word)
    }

    /// Normalized key of `raw` if it names an accepted category.
    pub fn category_key(&self, raw: &str) -> Option<String> {
        let key = normalize_category(raw);
        self.categories.contains_key(&key).then_some(key)
    }

    /// Accepted spelling for a normalized category key.
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.categories.get(key).map(String::as_str)
    }

    /// Distinct accepted category keys of `raw`, in first-seen order.
    pub fn tracked_categories(&self, raw: &[String]) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for name in raw {
            if let Some(key) = self.category_key(name) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn linking_word_count(&self) -> usize {
        self.linking_words.len()
    }
}
