//! Local filesystem report writer.
//!
//! Each artifact is written to a temporary sibling first and then renamed
//! into place, so a reader never observes a half-written file.

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::pipeline::Reports;
use crate::storage::{ALL_ARTICLES_FILE, KEYWORDS_FILE, ReportSink, SUMMARY_FILE, WriteSummary};

/// Writes report files into a directory.
#[derive(Debug, Clone)]
pub struct LocalReportWriter {
    root_dir: PathBuf,
}

impl LocalReportWriter {
    /// Create a writer rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a file name.
    fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Write text atomically (write to temp, then rename).
    async fn write_text(&self, name: &str, text: &str) -> Result<()> {
        let path = self.path(name);
        let tmp = self.path(&format!("{name}.tmp"));

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReportSink for LocalReportWriter {
    async fn write_reports(&self, reports: &Reports) -> Result<WriteSummary> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let (members, skipped_files) = plan_member_files(reports);

        self.write_text(ALL_ARTICLES_FILE, &reports.render_all_articles())
            .await?;

        for (name, uuids) in &members {
            self.write_text(name, &Reports::render_members(uuids)).await?;
        }

        self.write_text(KEYWORDS_FILE, &reports.render_keywords())
            .await?;
        self.write_text(SUMMARY_FILE, &reports.render_summary())
            .await?;

        let category_files = reports.categories.len() - skipped_files.categories;
        let language_files = reports.languages.len() - skipped_files.languages;
        let summary = WriteSummary {
            files_written: 3 + members.len(),
            category_files,
            language_files,
            skipped_files: skipped_files.categories + skipped_files.languages,
        };
        log::info!(
            "Wrote {} report files to {}",
            summary.files_written,
            self.root_dir.display()
        );
        Ok(summary)
    }
}

#[derive(Debug, Default)]
struct Skipped {
    categories: usize,
    languages: usize,
}

/// Whether `name` can be used as a file name inside the output directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

/// File names for the per-category and per-language lists.
///
/// Names that would escape the output directory are skipped. Names that
/// clash with a summary artifact or with each other are kept but logged,
/// since the later write replaces the earlier one.
fn plan_member_files(reports: &Reports) -> (Vec<(String, &Vec<String>)>, Skipped) {
    let reserved = [ALL_ARTICLES_FILE, KEYWORDS_FILE, SUMMARY_FILE];
    let mut seen: HashSet<String> = HashSet::new();
    let mut planned = Vec::new();
    let mut skipped = Skipped::default();

    let groups = [
        ("category", &reports.categories),
        ("language", &reports.languages),
    ];
    for (kind, lists) in groups {
        for (name, uuids) in lists {
            if !is_plain_file_name(name) {
                log::warn!("Skipping {kind} {name:?}: not a plain file name");
                if kind == "category" {
                    skipped.categories += 1;
                } else {
                    skipped.languages += 1;
                }
                continue;
            }

            let file_name = format!("{name}.txt");
            if reserved.contains(&file_name.as_str()) {
                log::warn!("{kind} {name:?} clashes with the {file_name} report");
            } else if !seen.insert(file_name.clone()) {
                log::warn!("{kind} {name:?} overwrites another list in {file_name}");
            }
            planned.push((file_name, uuids));
        }
    }
    (planned, skipped)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::*;
    use crate::pipeline::{RankedArticle, Summary};

    fn sample_reports() -> Reports {
        let mut categories = BTreeMap::new();
        categories.insert("World_News".to_string(), vec!["a".to_string(), "b".to_string()]);
        let mut languages = BTreeMap::new();
        languages.insert("english".to_string(), vec!["a".to_string()]);

        Reports {
            all_articles: vec![RankedArticle {
                uuid: "a".into(),
                published: "2024-01-01".into(),
                url: "https://news.example/a".into(),
            }],
            categories,
            languages,
            keywords: vec![("fox".into(), 1)],
            summary: Summary {
                duplicates_found: 0,
                unique_articles: 1,
                best_author: None,
                top_language: Some(("english".into(), 1)),
                top_category: Some(("World_News".into(), 1)),
                most_recent: Some(("2024-01-01".into(), "https://news.example/a".into())),
                top_keyword: Some(("fox".into(), 1)),
            },
        }
    }

    #[tokio::test]
    async fn test_write_text_replaces_atomically() {
        let tmp = TempDir::new().unwrap();
        let writer = LocalReportWriter::new(tmp.path());

        writer.write_text("x.txt", "old\n").await.unwrap();
        writer.write_text("x.txt", "new\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(tmp.path().join("x.txt")).unwrap(), "new\n");
        assert!(!tmp.path().join("x.txt.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_reports_layout() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let writer = LocalReportWriter::new(&out);

        let summary = writer.write_reports(&sample_reports()).await.unwrap();
        assert_eq!(summary.files_written, 5);
        assert_eq!(summary.category_files, 1);

        let read = |name: &str| std::fs::read_to_string(out.join(name)).unwrap();
        assert_eq!(read("all_articles.txt"), "a 2024-01-01\n");
        assert_eq!(read("World_News.txt"), "a\nb\n");
        assert_eq!(read("english.txt"), "a\n");
        assert_eq!(read("keywords_count.txt"), "fox 1\n");
        assert!(read("reports.txt").starts_with("duplicates_found - 0\nunique_articles - 1\n"));
        assert!(read("reports.txt").contains("best_author - - 0\n"));
    }

    #[tokio::test]
    async fn test_unsafe_names_are_skipped_before_writing() {
        let tmp = TempDir::new().unwrap();
        let writer = LocalReportWriter::new(tmp.path());

        let mut reports = sample_reports();
        reports
            .categories
            .insert("Arts/Culture".to_string(), vec!["a".to_string()]);
        reports.languages.insert("..".to_string(), vec!["a".to_string()]);

        let summary = writer.write_reports(&reports).await.unwrap();
        assert_eq!(summary.files_written, 5);
        assert_eq!(summary.category_files, 1);
        assert_eq!(summary.language_files, 1);
        assert_eq!(summary.skipped_files, 2);
        assert!(!tmp.path().join("Arts").exists());
        assert!(tmp.path().join("World_News.txt").exists());
    }

    #[test]
    fn test_reserved_and_shared_names_are_still_planned() {
        let mut reports = sample_reports();
        reports.categories.insert("reports".to_string(), vec!["a".to_string()]);
        reports.categories.insert("english".to_string(), vec!["b".to_string()]);

        let (planned, skipped) = plan_member_files(&reports);
        let names: Vec<&str> = planned.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(skipped.categories + skipped.languages, 0);
        assert_eq!(
            names,
            vec!["World_News.txt", "english.txt", "reports.txt", "english.txt"]
        );
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("World_News"));
        assert!(is_plain_file_name("english"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b"));
        assert!(!is_plain_file_name("a\\b"));
    }
}
