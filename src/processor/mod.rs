//! Main processing engine.
//!
//! Orchestrates one ETL run: discover the two source trees, load and conform
//! their records, build the star schema, and write the five tables.

pub mod discovery;
pub mod loader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::{FileDiscovery, SourceKind};
use self::loader::SourceLoader;
use self::writer::{ParquetPartitionWriter, PartitionedWriter, WriteMode};

use crate::config::EtlConfig;
use crate::constants::DEFAULT_OUTPUT_DIR_NAME;
use crate::context::ExecutionContext;
use crate::error::{EtlError, Result};
use crate::models::{RawLogEvent, RawSongRecord, RunSummary, TableWriteStats};
use crate::schema::TableRecord;
use crate::transform::StarSchema;
use crate::transform::temporal::enrich_song_plays;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tracing::{debug, info};

/// Runs the song catalog and activity log ETL
#[derive(Debug)]
pub struct EtlProcessor<W: PartitionedWriter = ParquetPartitionWriter> {
    input_root: PathBuf,
    output_path: PathBuf,
    config: EtlConfig,
    writer: Arc<W>,
}

/// `<input parent>/output` when no output root is given
pub fn default_output_path(input_root: &Path) -> PathBuf {
    input_root
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_OUTPUT_DIR_NAME)
}

impl EtlProcessor {
    /// Create a new processor writing Parquet with default settings
    pub fn new(input_root: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        // Verify input root exists
        if !input_root.is_dir() {
            return Err(EtlError::InputNotFound { path: input_root });
        }

        let output_path = output_path.unwrap_or_else(|| default_output_path(&input_root));
        let config = EtlConfig::default();
        let writer = Arc::new(ParquetPartitionWriter::new(config.writer.clone()));

        Ok(Self {
            input_root,
            output_path,
            config,
            writer,
        })
    }

    /// Configure the processor; the Parquet writer follows the new settings
    pub fn with_config(mut self, config: EtlConfig) -> Self {
        self.writer = Arc::new(ParquetPartitionWriter::new(config.writer.clone()));
        self.config = config;
        self
    }
}

impl<W: PartitionedWriter> EtlProcessor<W> {
    /// Swap the table writer
    pub fn with_writer<V: PartitionedWriter>(self, writer: Arc<V>) -> EtlProcessor<V> {
        EtlProcessor {
            input_root: self.input_root,
            output_path: self.output_path,
            config: self.config,
            writer,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        self.config.validate()?;

        let ctx = ExecutionContext::new(self.config.clone());
        info!(
            "Starting run {} ({} -> {})",
            ctx.run_id(),
            self.input_root.display(),
            self.output_path.display()
        );

        // Step 1: Discover both source trees before reading anything
        let discovery = FileDiscovery::new(self.input_root.clone());
        let song_files = discovery.discover(SourceKind::SongCatalog, &self.config.song_data_pattern)?;
        let log_files = discovery.discover(SourceKind::ActivityLog, &self.config.log_data_pattern)?;
        info!(
            "Found {} song files and {} log files",
            song_files.len(),
            log_files.len()
        );

        // Step 2: Load and conform records
        let loader = SourceLoader::new(self.config.max_concurrent_files, self.config.show_progress);
        let (catalog, song_stats) = loader
            .load::<RawSongRecord>(SourceKind::SongCatalog.name(), &song_files)
            .await?;
        let (events, log_stats) = loader
            .load::<RawLogEvent>(SourceKind::ActivityLog.name(), &log_files)
            .await?;

        // Step 3: Keep song plays and derive their time columns
        let enrichment = enrich_song_plays(events);
        debug!(
            "Kept {} song plays, filtered {} other events, {} with bad timestamps",
            enrichment.events.len(),
            enrichment.filtered,
            enrichment.bad_timestamp
        );

        // Step 4: Build all tables
        let schema = StarSchema::build(&ctx, &catalog, &enrichment.events);
        drop(catalog);

        // Step 5: Write tables
        fs::create_dir_all(&self.output_path).await?;
        let StarSchema {
            songs,
            artists,
            users,
            time,
            songplays,
        } = schema;

        let tables = vec![
            self.write_table(songs).await?,
            self.write_table(artists).await?,
            self.write_table(users).await?,
            self.write_table(time).await?,
            self.write_table(songplays).await?,
        ];

        let processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Run {} finished in {}ms: {}",
            ctx.run_id(),
            processing_time_ms,
            tables
                .iter()
                .map(|t| format!("{}={}", t.table, t.rows_written))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(RunSummary {
            run_id: ctx.run_id().to_string(),
            songs: song_stats,
            logs: log_stats,
            events_filtered: enrichment.filtered,
            events_bad_timestamp: enrichment.bad_timestamp,
            tables,
            output_path: self.output_path.clone(),
            processing_time_ms,
        })
    }

    /// Write one table on the blocking pool
    async fn write_table<R: TableRecord>(&self, rows: Vec<R>) -> Result<TableWriteStats> {
        let writer = Arc::clone(&self.writer);
        let path = self.output_path.join(R::TABLE.name);
        let task_path = path.clone();

        let stats = task::spawn_blocking(move || writer.write(&rows, &task_path, WriteMode::Overwrite))
            .await
            .map_err(|e| EtlError::WriteFailed {
                table: R::TABLE.name.to_string(),
                path,
                reason: format!("Failed to spawn write task: {}", e),
            })??;

        debug!(
            "Wrote table '{}': {} rows in {} files",
            stats.table, stats.rows_written, stats.files_written
        );
        Ok(stats)
    }
}
