//! Pipeline entry points for aggregator operations.
//!
//! - `run_aggregator`: Ingest all documents, then generate and write reports
//! - `run_validate`: Check config and inputs without ingesting

mod aggregate;
mod dispatch;
mod report;
mod validate;

pub use aggregate::{RunStats, build_reports, run_aggregator};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use report::{RankedArticle, Reports, SENTINEL, Summary};
pub use validate::run_validate;
