// src/services/parser.rs

//! Article document parsing.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::Article;

/// Articles parsed from one document.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub articles: Vec<Article>,
    /// Array elements dropped for missing or mistyped fields
    pub skipped: usize,
}

/// Read and parse one article document from disk.
pub fn read_document(path: &Path) -> Result<ParsedDocument> {
    let content = fs::read_to_string(path)?;
    parse_document(&content).map_err(|e| AppError::parse(path.display().to_string(), e))
}

/// Parse a JSON array of article objects.
///
/// Elements that do not deserialize into an [`Article`] are skipped.
pub fn parse_document(content: &str) -> Result<ParsedDocument> {
    let root: Value = serde_json::from_str(content)?;
    let Value::Array(items) = root else {
        return Err(AppError::parse("document", "root is not a JSON array"));
    };

    let mut parsed = ParsedDocument::default();
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Article>(item) {
            Ok(article) => parsed.articles.push(article),
            Err(e) => {
                log::warn!("Skipping record #{position}: {e}");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}
