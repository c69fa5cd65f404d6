// src/models/mod.rs

//! Domain models for the aggregator.

mod article;
mod config;
mod vocabulary;

// Re-export all public types
pub use article::Article;
pub use config::{Config, IngestConfig, LoggingConfig, OutputConfig};
pub use vocabulary::{Vocabulary, WHITESPACE, normalize_category};
