//! Partitioned Parquet output
//!
//! Writes each table as a Hive-style directory tree
//! (`songs/year=2000/artist_id=A1/part-00000.parquet`). Partition columns are
//! encoded in the directory names and left out of the files. A table is
//! staged next to its destination and only swapped in once every file and
//! the `_SUCCESS` marker are written.

use crate::config::WriterOptions;
use crate::constants::{HIVE_DEFAULT_PARTITION, PARQUET_EXTENSION, SUCCESS_MARKER};
use crate::error::{EtlError, Result};
use crate::models::TableWriteStats;
use crate::schema::TableRecord;

use polars::prelude::{DataFrame, ParquetWriter as PolarsParquetWriter, StatisticsOptions};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How existing output at the destination is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole destination directory
    Overwrite,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Overwrite => f.write_str("overwrite"),
        }
    }
}

/// Destination for finished tables
pub trait PartitionedWriter: Send + Sync + 'static {
    /// Persist `rows` at `path`, partitioned by the table's declared columns
    fn write<R: TableRecord>(
        &self,
        rows: &[R],
        path: &Path,
        mode: WriteMode,
    ) -> Result<TableWriteStats>;
}

/// Local filesystem Parquet writer
#[derive(Debug, Clone, Default)]
pub struct ParquetPartitionWriter {
    options: WriterOptions,
}

impl ParquetPartitionWriter {
    /// Create a new Parquet writer
    pub fn new(options: WriterOptions) -> Self {
        Self { options }
    }

    /// Write DataFrame to parquet with configured settings
    fn write_file(&self, mut df: DataFrame, path: &Path) -> std::result::Result<(), String> {
        let file = fs::File::create(path).map_err(|e| e.to_string())?;
        let statistics = if self.options.enable_statistics {
            StatisticsOptions::full()
        } else {
            StatisticsOptions::empty()
        };
        let writer = PolarsParquetWriter::new(file)
            .with_compression(self.options.compression.to_polars_compression())
            .with_statistics(statistics);

        let writer = if let Some(row_group_size) = self.options.row_group_size {
            writer.with_row_group_size(Some(row_group_size))
        } else {
            writer
        };

        writer
            .finish(&mut df)
            .map(|_| ())
            .map_err(|e| format!("Failed to write parquet: {}", e))
    }

    /// Write every partition of `rows` below `root`; returns files written
    fn write_partitions<R: TableRecord>(&self, rows: &[R], root: &Path) -> Result<usize> {
        let spec = R::TABLE;
        let fail = |path: &Path, reason: String| EtlError::WriteFailed {
            table: spec.name.to_string(),
            path: path.to_path_buf(),
            reason,
        };

        let mut groups: BTreeMap<Vec<String>, Vec<&R>> = BTreeMap::new();
        if !spec.is_partitioned() {
            groups.insert(Vec::new(), Vec::new());
        }
        for row in rows {
            let key = spec
                .partition_columns
                .iter()
                .map(|column| partition_segment(column, row.partition_value(column).as_deref()))
                .collect();
            groups.entry(key).or_default().push(row);
        }

        for (segments, group) in &groups {
            let dir = segments.iter().fold(root.to_path_buf(), |dir, s| dir.join(s));
            fs::create_dir_all(&dir)?;

            let mut frame = R::to_frame(group).map_err(|e| fail(&dir, e.to_string()))?;
            for column in spec.partition_columns {
                frame = frame.drop(column).map_err(|e| fail(&dir, e.to_string()))?;
            }

            let file = dir.join(format!("part-00000.{}", PARQUET_EXTENSION));
            self.write_file(frame, &file)
                .map_err(|reason| fail(&file, reason))?;
        }

        Ok(groups.len())
    }
}

impl PartitionedWriter for ParquetPartitionWriter {
    fn write<R: TableRecord>(
        &self,
        rows: &[R],
        path: &Path,
        mode: WriteMode,
    ) -> Result<TableWriteStats> {
        let spec = R::TABLE;
        debug!(
            "Writing {} rows to table '{}' at {} (mode: {}, partitioned by {:?})",
            rows.len(),
            spec.name,
            path.display(),
            mode,
            spec.partition_columns
        );

        let staging = staging_path(path);
        if staging.exists() {
            warn!("Removing leftover staging directory {}", staging.display());
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let files_written = match self.write_partitions(rows, &staging) {
            Ok(files) => files,
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&staging) {
                    warn!("Failed to clean up {}: {}", staging.display(), cleanup);
                }
                return Err(e);
            }
        };
        fs::write(staging.join(SUCCESS_MARKER), b"")?;

        match mode {
            WriteMode::Overwrite => {
                if path.exists() {
                    fs::remove_dir_all(path)?;
                }
                fs::rename(&staging, path)?;
            }
        }

        Ok(TableWriteStats {
            table: spec.name.to_string(),
            rows_written: rows.len(),
            files_written,
            path: path.to_path_buf(),
        })
    }
}

/// Hidden sibling directory used while a table is being written
pub fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "table".to_string());
    destination.with_file_name(format!(".{}.staging", name))
}

/// `column=value` directory name; null and empty values use the Hive default
pub fn partition_segment(column: &str, value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => format!("{}={}", column, escape_partition_value(value)),
        _ => format!("{}={}", column, HIVE_DEFAULT_PARTITION),
    }
}

/// Percent-encode characters that are unsafe in a partition directory name
pub fn escape_partition_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        let needs_escape = matches!(
            c,
            '"' | '#' | '%' | '\'' | '*' | '/' | ':' | '=' | '?' | '\\' | '{' | '[' | ']' | '^'
        ) || ('\u{01}'..='\u{1F}').contains(&c)
            || c == '\u{7F}';

        if needs_escape {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}
