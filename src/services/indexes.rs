// src/services/indexes.rs

//! Aggregate indexes derived from the set of valid articles.
//!
//! `record` and `erase` are exact inverses. Callers must hold the identity
//! locks of the article so the two never interleave for the same uuid.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::models::{Article, Vocabulary};
use crate::services::keywords::{KEYWORD_LANGUAGE, extract_keywords};

/// Concurrent category, language, keyword and author indexes.
#[derive(Default)]
pub struct DerivedIndexes {
    pub(crate) categories: DashMap<String, HashSet<String>>,
    pub(crate) languages: DashMap<String, HashSet<String>>,
    pub(crate) keyword_counts: DashMap<String, u64>,
    pub(crate) author_counts: DashMap<String, u64>,
    pub(crate) keywords_by_article: DashMap<String, HashSet<String>>,
}

impl DerivedIndexes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every contribution of a newly valid article.
    pub fn record(&self, article: &Article, vocabulary: &Vocabulary) {
        if let Some(author) = article.author() {
            *self.author_counts.entry(author.to_string()).or_insert(0) += 1;
        }

        for key in vocabulary.tracked_categories(&article.categories) {
            self.categories
                .entry(key)
                .or_default()
                .insert(article.uuid.clone());
        }

        if let Some(language) = article.language() {
            if vocabulary.is_language(language) {
                self.languages
                    .entry(language.to_string())
                    .or_default()
                    .insert(article.uuid.clone());
            }

            if language == KEYWORD_LANGUAGE {
                if let Some(text) = &article.text {
                    let keywords = extract_keywords(text, vocabulary);
                    if !keywords.is_empty() {
                        for word in &keywords {
                            *self.keyword_counts.entry(word.clone()).or_insert(0) += 1;
                        }
                        self.keywords_by_article
                            .insert(article.uuid.clone(), keywords);
                    }
                }
            }
        }
    }

    /// Remove every contribution previously recorded for `article`.
    pub fn erase(&self, article: &Article, vocabulary: &Vocabulary) {
        for key in vocabulary.tracked_categories(&article.categories) {
            if let Some(mut members) = self.categories.get_mut(&key) {
                members.remove(&article.uuid);
            }
        }

        if let Some(language) = article.language() {
            if let Some(mut members) = self.languages.get_mut(language) {
                members.remove(&article.uuid);
            }
        }

        if let Some((_, keywords)) = self.keywords_by_article.remove(&article.uuid) {
            for word in keywords {
                decrement(&self.keyword_counts, word);
            }
        }

        if let Some(author) = article.author() {
            decrement(&self.author_counts, author.to_string());
        }
    }

    /// Move the indexes out of their concurrent containers.
    pub fn into_parts(self) -> IndexSnapshot {
        IndexSnapshot {
            categories: self.categories.into_iter().collect(),
            languages: self.languages.into_iter().collect(),
            keyword_counts: self.keyword_counts.into_iter().collect(),
            author_counts: self.author_counts.into_iter().collect(),
        }
    }
}

/// Plain-map view of the indexes once ingestion has finished.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    pub categories: HashMap<String, HashSet<String>>,
    pub languages: HashMap<String, HashSet<String>>,
    pub keyword_counts: HashMap<String, u64>,
    pub author_counts: HashMap<String, u64>,
}

/// Decrement a counter, removing the entry when it reaches zero.
fn decrement<K: Eq + Hash>(counts: &DashMap<K, u64>, key: K) {
    if let Entry::Occupied(mut entry) = counts.entry(key) {
        let count = entry.get_mut();
        *count = count.saturating_sub(1);
        if *count == 0 {
            entry.remove();
        }
    }
}
