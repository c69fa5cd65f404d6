//! News Aggregator CLI
//!
//! Ingests article documents with a worker pool and writes the reports.

use std::path::PathBuf;

use aggregator::{
    error::Result,
    models::Config,
    pipeline,
    storage::LocalReportWriter,
};
use clap::{Parser, Subcommand};

/// Concurrent news article aggregator
#[derive(Parser, Debug)]
#[command(name = "aggregator", version, about = "Deduplicating news article aggregator")]
struct Cli {
    /// Path to an optional TOML config file
    #[arg(short, long, default_value = "aggregator.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest every listed document and write the reports
    Run {
        /// Number of worker threads
        workers: usize,
        /// File listing the article documents
        articles: PathBuf,
        /// File listing the languages, categories and linking-word files
        aux: PathBuf,
        /// Directory receiving the report files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the config and inputs without ingesting
    Validate {
        /// File listing the article documents
        articles: PathBuf,
        /// File listing the languages, categories and linking-word files
        aux: PathBuf,
    },
}

/// Initialize logging from the verbosity flag or the configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_exists = cli.config.exists();
    let mut config = if config_exists {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    init_logging(cli.verbose, &config.logging.level);

    if config_exists {
        log::info!("Loaded configuration from {}", cli.config.display());
    }

    match cli.command {
        Command::Run {
            workers,
            articles,
            aux,
            output,
        } => {
            config.ingest.workers = workers;
            if let Some(dir) = output {
                config.output.dir = dir.display().to_string();
            }

            // Every input error surfaces here, before any worker starts.
            let inputs = pipeline::run_validate(&config, &articles, &aux)?;

            let writer = LocalReportWriter::new(&config.output.dir);
            let (stats, written) = pipeline::run_aggregator(&config, inputs, &writer).await?;

            log::info!(
                "Done: {} unique articles, {} duplicates, {} files written",
                stats.unique_articles,
                stats.duplicates,
                written.files_written
            );
        }

        Command::Validate { articles, aux } => {
            let inputs = pipeline::run_validate(&config, &articles, &aux)?;
            log::info!(
                "All validations passed: {} documents, {} languages, {} categories, {} linking words",
                inputs.files.len(),
                inputs.vocabulary.language_count(),
                inputs.vocabulary.category_count(),
                inputs.vocabulary.linking_word_count()
            );
        }
    }

    Ok(())
}
