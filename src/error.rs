// src/error.rs

//! Unified error handling for the aggregator.

use std::fmt;

use thiserror::Error;

/// Result type alias for aggregator operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Input configuration error (list files, vocabulary files)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config value validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// An article document could not be read or parsed
    #[error("Parse error for {context}: {message}")]
    Parse { context: String, message: String },

    /// A worker thread died before finishing its shard
    #[error("Worker failure: {0}")]
    Worker(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a document parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a worker failure error.
    pub fn worker(message: impl fmt::Display) -> Self {
        Self::Worker(message.to_string())
    }
}
