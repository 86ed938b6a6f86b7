//! Schema conformance loading
//!
//! Reads line-delimited JSON files into typed records. A line that does not
//! deserialize into the target record type (bad JSON, missing identifier,
//! wrong field type) is dropped and counted. A file where no line parses is
//! retried as a single pretty-printed document. Failing to read a file at
//! all aborts the load.

use crate::error::{EtlError, Result};
use crate::models::LoadStats;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, warn};

/// Records parsed from one file
#[derive(Debug)]
pub struct ParsedFile<T> {
    pub records: Vec<T>,
    pub dropped: usize,
}

/// Parse every non-blank line of `bytes` as one `T`, falling back to the
/// whole input as one `T` when no line parses
pub fn parse_lines<T: DeserializeOwned>(bytes: &[u8]) -> ParsedFile<T> {
    let mut records = Vec::new();
    let mut dropped = 0;

    for line in bytes.split(|b| *b == b'\n') {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_slice::<T>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("Dropping malformed record: {}", e);
                dropped += 1;
            }
        }
    }

    if records.is_empty() && dropped > 1 {
        if let Ok(record) = serde_json::from_slice::<T>(bytes.trim_ascii()) {
            return ParsedFile {
                records: vec![record],
                dropped: 0,
            };
        }
    }

    ParsedFile { records, dropped }
}

/// Read and parse one file
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<ParsedFile<T>> {
    let bytes = std::fs::read(path).map_err(|e| EtlError::SourceReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let parsed = parse_lines(&bytes);
    if parsed.dropped > 0 {
        debug!(
            "{}: kept {} records, dropped {}",
            path.display(),
            parsed.records.len(),
            parsed.dropped
        );
    }
    Ok(parsed)
}

/// Loads a whole source tree with bounded concurrency
#[derive(Debug, Clone)]
pub struct SourceLoader {
    max_concurrent_files: usize,
    show_progress: bool,
}

impl SourceLoader {
    pub fn new(max_concurrent_files: usize, show_progress: bool) -> Self {
        Self {
            max_concurrent_files: max_concurrent_files.max(1),
            show_progress,
        }
    }

    /// Parse all files, returning records in file order then line order
    pub async fn load<T>(&self, label: &str, files: &[PathBuf]) -> Result<(Vec<T>, LoadStats)>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb.set_message(format!("Loading {}", label));
            pb
        } else {
            ProgressBar::hidden()
        };

        let results = stream::iter(files.iter().cloned())
            .map(|path| {
                let pb = pb.clone();
                async move {
                    let result = task::spawn_blocking({
                        let path = path.clone();
                        move || load_file::<T>(&path)
                    })
                    .await
                    .map_err(|e| EtlError::SourceReadFailed {
                        path: path.clone(),
                        reason: format!("Failed to spawn parse task: {}", e),
                    })
                    .and_then(|parsed| parsed);
                    pb.inc(1);
                    result
                }
            })
            .buffered(self.max_concurrent_files)
            .collect::<Vec<_>>()
            .await;

        let mut records = Vec::new();
        let mut stats = LoadStats::default();
        for result in results {
            let parsed = result?;
            stats.files_read += 1;
            stats.records_parsed += parsed.records.len();
            stats.records_dropped += parsed.dropped;
            records.extend(parsed.records);
        }

        pb.finish_with_message(format!("{} loaded", label));

        if stats.records_dropped > 0 {
            warn!(
                "Dropped {} malformed {} records ({} kept from {} files)",
                stats.records_dropped, label, stats.records_parsed, stats.files_read
            );
        }
        debug!("Loaded {} {} records", stats.records_parsed, label);

        Ok((records, stats))
    }
}
