// src/pipeline/dispatch.rs

//! Worker pool that feeds article documents into the engine.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;

use crate::error::{AppError, Result};
use crate::services::{Admission, IngestEngine, read_document};

/// Summary of one dispatch run.
#[derive(Debug, Default, Clone)]
pub struct DispatchOutcome {
    pub file_total: usize,
    pub file_failures: usize,
    pub records: usize,
    pub records_skipped: usize,
    pub admissions: HashMap<Admission, usize>,
}

impl DispatchOutcome {
    fn merge(&mut self, other: DispatchOutcome) {
        self.file_total += other.file_total;
        self.file_failures += other.file_failures;
        self.records += other.records;
        self.records_skipped += other.records_skipped;
        for (admission, count) in other.admissions {
            *self.admissions.entry(admission).or_insert(0) += count;
        }
    }

    /// Number of records that ended with `admission`.
    pub fn count(&self, admission: Admission) -> usize {
        self.admissions.get(&admission).copied().unwrap_or(0)
    }
}

/// Fixed-size worker pool over a list of document paths.
pub struct Dispatcher {
    workers: usize,
}

impl Dispatcher {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Split `files` round-robin into one shard per worker.
    pub fn partition(&self, files: Vec<PathBuf>) -> Vec<Vec<PathBuf>> {
        let mut shards = vec![Vec::new(); self.workers];
        for (i, file) in files.into_iter().enumerate() {
            shards[i % self.workers].push(file);
        }
        shards
    }

    /// Ingest every file and wait until all workers are done.
    ///
    /// A file that cannot be read or parsed is logged and skipped. A worker
    /// that panics fails the whole run.
    pub async fn run_all(
        &self,
        engine: Arc<IngestEngine>,
        files: Vec<PathBuf>,
    ) -> Result<DispatchOutcome> {
        let handles: Vec<_> = self
            .partition(files)
            .into_iter()
            .enumerate()
            .map(|(worker_id, shard)| {
                let engine = Arc::clone(&engine);
                tokio::task::spawn_blocking(move || run_worker(worker_id, &engine, shard))
            })
            .collect();

        // Completion barrier: nothing reads the engine before this resolves.
        let mut outcome = DispatchOutcome::default();
        for joined in join_all(handles).await {
            let worker_outcome = joined.map_err(AppError::worker)?;
            outcome.merge(worker_outcome);
        }
        Ok(outcome)
    }
}

fn run_worker(worker_id: usize, engine: &IngestEngine, shard: Vec<PathBuf>) -> DispatchOutcome {
    let mut outcome = DispatchOutcome {
        file_total: shard.len(),
        ..DispatchOutcome::default()
    };

    for path in shard {
        match read_document(&path) {
            Ok(document) => {
                outcome.records += document.articles.len();
                outcome.records_skipped += document.skipped;
                for article in document.articles {
                    *outcome.admissions.entry(engine.ingest(article)).or_insert(0) += 1;
                }
                log::debug!("Worker {worker_id} finished {}", path.display());
            }
            Err(error) => {
                outcome.file_failures += 1;
                log::warn!("Failed to ingest {}: {}", path.display(), error);
            }
        }
    }
    outcome
}
