//! Configuration management and validation.
//!
//! Provides the run configuration: source file patterns, loader
//! concurrency, user snapshot strategy and Parquet writer options.
//! Defaults can be overridden from a JSON file and then from CLI flags.

use crate::constants::{DEFAULT_LOG_DATA_PATTERN, DEFAULT_SONG_DATA_PATTERN};
use crate::error::{EtlError, Result};
use clap::ValueEnum;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    #[value(name = "none", alias = "uncompressed")]
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// How the users dimension picks the "current" profile row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UserSnapshotStrategy {
    /// Keep the rows at each user's latest play, one per level seen there
    #[value(name = "per-user")]
    LatestPerUser,
    /// Keep the latest row for every (user, level) pair ever seen
    #[value(name = "per-level")]
    LatestPerLevel,
}

/// Parquet writer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Compression algorithm selection
    pub compression: CompressionAlgorithm,

    /// Enable column statistics for query pruning
    pub enable_statistics: bool,

    /// Rows per row group; `None` leaves the polars default
    pub row_group_size: Option<usize>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            compression: CompressionAlgorithm::Snappy,
            enable_statistics: true,
            row_group_size: None,
        }
    }
}

/// Global configuration for an ETL run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Glob for song catalog files, relative to the input root
    pub song_data_pattern: String,

    /// Glob for activity log files, relative to the input root
    pub log_data_pattern: String,

    /// Maximum files parsed concurrently
    pub max_concurrent_files: usize,

    /// Users dimension resolution
    pub user_snapshot: UserSnapshotStrategy,

    /// Parquet output settings
    pub writer: WriterOptions,

    /// Show progress bars while loading
    pub show_progress: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            song_data_pattern: DEFAULT_SONG_DATA_PATTERN.to_string(),
            log_data_pattern: DEFAULT_LOG_DATA_PATTERN.to_string(),
            max_concurrent_files: num_cpus::get().max(1),
            user_snapshot: UserSnapshotStrategy::LatestPerUser,
            writer: WriterOptions::default(),
            show_progress: true,
        }
    }
}

impl EtlConfig {
    /// Load a configuration file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        debug!("Loaded configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(EtlError::configuration(
                "max_concurrent_files must be at least 1",
            ));
        }
        if self.song_data_pattern.trim().is_empty() || self.log_data_pattern.trim().is_empty() {
            return Err(EtlError::configuration("source patterns must not be empty"));
        }
        if self.writer.row_group_size == Some(0) {
            return Err(EtlError::configuration("row_group_size must be positive"));
        }
        Ok(())
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    pub fn with_user_snapshot(mut self, strategy: UserSnapshotStrategy) -> Self {
        self.user_snapshot = strategy;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.writer.compression = compression;
        self
    }

    /// Override both source patterns
    pub fn with_patterns(mut self, song_data: impl Into<String>, log_data: impl Into<String>) -> Self {
        self.song_data_pattern = song_data.into();
        self.log_data_pattern = log_data.into();
        self
    }

    /// Disable progress bars (tests, non-interactive runs)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }
}
