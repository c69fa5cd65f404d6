//! Output sinks for generated reports.
//!
//! ## Directory Structure
//!
//! ```text
//! {output}/
//! ├── all_articles.txt      # uuid + published, newest first
//! ├── keywords_count.txt    # keyword + count, most frequent first
//! ├── reports.txt           # summary statistics
//! ├── <Category_Key>.txt    # one per non-empty accepted category
//! └── <language>.txt        # one per non-empty accepted language
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::pipeline::Reports;

// Re-export for convenience
pub use local::LocalReportWriter;

pub const ALL_ARTICLES_FILE: &str = "all_articles.txt";
pub const KEYWORDS_FILE: &str = "keywords_count.txt";
pub const SUMMARY_FILE: &str = "reports.txt";

/// Metadata about a report write.
#[derive(Debug, Clone, Default)]
pub struct WriteSummary {
    pub files_written: usize,
    pub category_files: usize,
    pub language_files: usize,
    /// Lists not written because their name is not a plain file name
    pub skipped_files: usize,
}

/// Trait for report output backends.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Write every artifact of `reports`.
    async fn write_reports(&self, reports: &Reports) -> Result<WriteSummary>;
}
