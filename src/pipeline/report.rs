// src/pipeline/report.rs

//! Deterministic reports over the settled engine state.
//!
//! Every ordering here is total, so the output depends only on which
//! articles survived ingestion and never on the order they arrived in.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::models::Article;
use crate::services::FrozenState;

/// Placeholder used when a summary line has no data.
pub const SENTINEL: &str = "-";

/// One ranked article line of `all_articles.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedArticle {
    pub uuid: String,
    pub published: String,
    pub url: String,
}

/// Summary statistics written to `reports.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub duplicates_found: u64,
    pub unique_articles: usize,
    pub best_author: Option<(String, u64)>,
    pub top_language: Option<(String, u64)>,
    pub top_category: Option<(String, u64)>,
    /// `(published, url)` of the newest article
    pub most_recent: Option<(String, String)>,
    pub top_keyword: Option<(String, u64)>,
}

/// Every artifact, ready to be written.
#[derive(Debug, Clone)]
pub struct Reports {
    pub all_articles: Vec<RankedArticle>,
    /// normalized category key -> sorted uuids (non-empty only)
    pub categories: BTreeMap<String, Vec<String>>,
    /// language -> sorted uuids (non-empty only)
    pub languages: BTreeMap<String, Vec<String>>,
    pub keywords: Vec<(String, u64)>,
    pub summary: Summary,
}

impl Reports {
    /// Build every report from the frozen state.
    pub fn generate(state: &FrozenState) -> Self {
        let all_articles = rank_articles(state.articles.values());
        let keywords = rank_counts(&state.indexes.keyword_counts);

        let summary = Summary {
            duplicates_found: state.duplicates,
            unique_articles: state.articles.len(),
            best_author: top_entry(&state.indexes.author_counts),
            top_language: top_entry(&tally_languages(state)),
            top_category: top_entry(&tally_categories(state)),
            most_recent: all_articles
                .first()
                .map(|a| (a.published.clone(), a.url.clone())),
            top_keyword: keywords.first().cloned(),
        };

        Self {
            all_articles,
            categories: sorted_members(&state.indexes.categories),
            languages: sorted_members(&state.indexes.languages),
            keywords,
            summary,
        }
    }

    /// Contents of `all_articles.txt`.
    pub fn render_all_articles(&self) -> String {
        self.all_articles
            .iter()
            .map(|a| format!("{} {}\n", a.uuid, a.published))
            .collect()
    }

    /// Contents of `keywords_count.txt`.
    pub fn render_keywords(&self) -> String {
        self.keywords
            .iter()
            .map(|(word, count)| format!("{word} {count}\n"))
            .collect()
    }

    /// Contents of a per-category or per-language file.
    pub fn render_members(uuids: &[String]) -> String {
        uuids.iter().map(|uuid| format!("{uuid}\n")).collect()
    }

    /// Contents of `reports.txt`.
    pub fn render_summary(&self) -> String {
        let s = &self.summary;
        let counted = |entry: &Option<(String, u64)>| match entry {
            Some((name, count)) => format!("{name} {count}"),
            None => format!("{SENTINEL} 0"),
        };
        let most_recent = match &s.most_recent {
            Some((published, url)) => format!("{published} {url}"),
            None => format!("{SENTINEL} {SENTINEL}"),
        };

        format!(
            "duplicates_found - {}\n\
             unique_articles - {}\n\
             best_author - {}\n\
             top_language - {}\n\
             top_category - {}\n\
             most_recent_article - {}\n\
             top_keyword_en - {}\n",
            s.duplicates_found,
            s.unique_articles,
            counted(&s.best_author),
            counted(&s.top_language),
            counted(&s.top_category),
            most_recent,
            counted(&s.top_keyword),
        )
    }
}

/// Newest first, ties by uuid ascending.
fn rank_articles<'a>(articles: impl Iterator<Item = &'a Arc<Article>>) -> Vec<RankedArticle> {
    let mut ranked: Vec<RankedArticle> = articles
        .map(|a| RankedArticle {
            uuid: a.uuid.clone(),
            published: a.published.clone(),
            url: a.url.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.published
            .cmp(&a.published)
            .then_with(|| a.uuid.cmp(&b.uuid))
    });
    ranked
}

/// Highest count first, ties by name ascending.
fn rank_counts(counts: &HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts.iter().map(|(k, &v)| (k.clone(), v)).collect();
    ranked.sort_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)));
    ranked
}

/// Highest count, ties broken by the smallest name.
fn top_entry(counts: &HashMap<String, u64>) -> Option<(String, u64)> {
    counts
        .iter()
        .filter(|&(_, &count)| count > 0)
        .min_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)))
        .map(|(name, &count)| (name.clone(), count))
}

fn sorted_members(index: &HashMap<String, HashSet<String>>) -> BTreeMap<String, Vec<String>> {
    index
        .iter()
        .filter(|(_, members)| !members.is_empty())
        .map(|(key, members)| {
            let mut uuids: Vec<String> = members.iter().cloned().collect();
            uuids.sort();
            (key.clone(), uuids)
        })
        .collect()
}

/// Languages of valid articles, including ones outside the accepted set.
fn tally_languages(state: &FrozenState) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for article in state.articles.values() {
        if let Some(language) = article.language() {
            *counts.entry(language.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Accepted categories of valid articles, once per article.
fn tally_categories(state: &FrozenState) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for article in state.articles.values() {
        for key in state.vocabulary.tracked_categories(&article.categories) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}
