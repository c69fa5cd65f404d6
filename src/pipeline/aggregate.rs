// src/pipeline/aggregate.rs

//! Full aggregation run: ingest, settle, report, write.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::RunInputs;
use crate::error::{AppError, Result};
use crate::models::Config;
use crate::pipeline::{DispatchOutcome, Dispatcher, Reports};
use crate::services::{Admission, IngestEngine};
use crate::storage::{ReportSink, WriteSummary};

/// Timing and volume of one run.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub dispatch: DispatchOutcome,
    pub duplicates: u64,
    pub unique_articles: usize,
}

/// Ingest every input file and build the reports, without writing them.
pub async fn build_reports(config: &Config, inputs: RunInputs) -> Result<(Reports, RunStats)> {
    let start_time = Utc::now();
    let vocabulary = Arc::new(inputs.vocabulary);
    let engine = Arc::new(IngestEngine::new(
        Arc::clone(&vocabulary),
        config.ingest.lock_stripes,
    ));

    log::info!(
        "Ingesting {} documents with {} workers",
        inputs.files.len(),
        config.ingest.workers
    );
    let dispatch = Dispatcher::new(config.ingest.workers)
        .run_all(Arc::clone(&engine), inputs.files)
        .await?;

    let engine = Arc::into_inner(engine)
        .ok_or_else(|| AppError::worker("engine still shared after all workers finished"))?;
    let state = engine.freeze();
    let reports = Reports::generate(&state);

    for key in reports.categories.keys() {
        log::debug!(
            "Category {} ({})",
            key,
            vocabulary.display_name(key).unwrap_or(key)
        );
    }

    let stats = RunStats {
        start_time,
        end_time: Utc::now(),
        duplicates: state.duplicates,
        unique_articles: state.articles.len(),
        dispatch,
    };
    Ok((reports, stats))
}

/// Run the aggregator end to end.
///
/// Nothing is written unless ingestion and report generation both succeed.
pub async fn run_aggregator(
    config: &Config,
    inputs: RunInputs,
    sink: &dyn ReportSink,
) -> Result<(RunStats, WriteSummary)> {
    let (reports, stats) = build_reports(config, inputs).await?;
    log_stats(&stats);

    let written = sink.write_reports(&reports).await?;
    Ok((stats, written))
}

fn log_stats(stats: &RunStats) {
    let d = &stats.dispatch;
    let elapsed = stats.end_time - stats.start_time;
    log::info!(
        "Files: {} ({} failed), records: {} ({} skipped)",
        d.file_total,
        d.file_failures,
        d.records,
        d.records_skipped
    );
    log::info!(
        "Accepted {}, rejected {}, uuid conflicts {}, title conflicts {}",
        d.count(Admission::Accepted),
        d.count(Admission::Rejected),
        d.count(Admission::UuidConflict),
        d.count(Admission::TitleConflict)
    );
    log::info!(
        "Unique articles: {}, duplicates: {}, elapsed: {} ms",
        stats.unique_articles,
        stats.duplicates,
        elapsed.num_milliseconds()
    );
}
