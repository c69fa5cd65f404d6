//! Article data structure.

use serde::{Deserialize, Deserializer};

/// A news article parsed from an input document.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Article {
    /// Unique identifier
    pub uuid: String,

    /// Headline, also an identity key
    pub title: String,

    /// Author name (empty is treated as absent)
    #[serde(default)]
    pub author: Option<String>,

    /// Canonical URL
    pub url: String,

    /// Body text
    #[serde(default)]
    pub text: Option<String>,

    /// Publication timestamp, lexicographically sortable
    pub published: String,

    /// Language name (e.g., "english")
    #[serde(default)]
    pub language: Option<String>,

    /// Free-form category names, possibly repeated or unaccepted
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
}

impl Article {
    /// Author name, if present and non-empty.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty())
    }

    /// Language name, if present and non-empty.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref().filter(|l| !l.is_empty())
    }
}

/// Treat an explicit `null` list like a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
