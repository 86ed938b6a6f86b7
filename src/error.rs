//! Error handling for ETL runs.
//!
//! Only whole-run failures live here. Malformed individual records and join
//! misses are not errors; they are counted in the load statistics instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input root not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid source pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to traverse source tree: {0}")]
    Traversal(#[from] glob::GlobError),

    #[error("No {source_name} files matched pattern: {pattern}")]
    NoSourceFiles {
        source_name: String,
        pattern: String,
    },

    #[error("Failed to read source file: {path} - {reason}")]
    SourceReadFailed { path: PathBuf, reason: String },

    #[error("Failed to write table '{table}' to {path}: {reason}")]
    WriteFailed {
        table: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid configuration file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    #[error("Run interrupted: {reason}")]
    Interrupted { reason: String },
}

impl EtlError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
