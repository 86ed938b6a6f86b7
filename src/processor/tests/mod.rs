//! Integration tests for the processor module
//!
//! Tests the complete pipeline against small input trees laid out like the
//! real song_data and log_data sources.


use crate::config::EtlConfig;
use crate::error::Result;
use crate::models::TableWriteStats;
use crate::processor::writer::{PartitionedWriter, WriteMode};
use crate::schema::TableRecord;
use polars::prelude::{DataFrame, ParquetReader, SerReader};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// One song catalog line
pub fn song_json(song_id: &str, title: &str, artist_id: &str, year: i32) -> String {
    format!(
        r#"{{"num_songs": 1, "artist_id": "{}", "artist_latitude": null, "artist_longitude": null, "artist_location": "", "artist_name": "Artist {}", "song_id": "{}", "title": "{}", "duration": 180.0, "year": {}}}"#,
        artist_id, artist_id, song_id, title, year
    )
}

/// One activity log line
pub fn event_json(user_id: &str, level: &str, page: &str, song: &str, ts: i64) -> String {
    format!(
        r#"{{"artist":"Artist","auth":"Logged In","firstName":"Ada","gender":"F","itemInSession":0,"lastName":"Lovelace","length":180.0,"level":"{}","location":"X","method":"PUT","page":"{}","registration":1540919166796.0,"sessionId":100,"song":"{}","status":200,"ts":{},"userAgent":"UA","userId":"{}"}}"#,
        level, page, song, ts, user_id
    )
}

/// Input tree with one song file and one log file. Returns the input root.
pub fn create_input(temp_dir: &TempDir, songs: &[String], events: &[String]) -> PathBuf {
    let root = temp_dir.path().join("input");

    let song_dir = root.join("song_data").join("A").join("A").join("A");
    fs::create_dir_all(&song_dir).unwrap();
    fs::write(song_dir.join("TRAAAAA.json"), songs.join("\n")).unwrap();

    let log_dir = root.join("log_data").join("2018").join("10");
    fs::create_dir_all(&log_dir).unwrap();
    fs::write(log_dir.join("2018-10-20-events.json"), events.join("\n")).unwrap();

    root
}

pub fn test_config() -> EtlConfig {
    EtlConfig::default()
        .with_max_concurrent_files(2)
        .without_progress()
}

pub fn read_parquet(path: &Path) -> DataFrame {
    ParquetReader::new(fs::File::open(path).unwrap())
        .finish()
        .unwrap()
}

/// Every parquet file of a table, sorted by path
pub fn table_files(table_dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*.parquet", table_dir.display());
    let mut files: Vec<_> = glob::glob(&pattern).unwrap().flatten().collect();
    files.sort();
    files
}

/// What a writer was asked to do for one table
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
    pub table: &'static str,
    pub partition_columns: &'static [&'static str],
    pub rows: usize,
    pub path: PathBuf,
    pub mode: WriteMode,
}

/// Writer that records calls instead of touching the filesystem
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub calls: Mutex<Vec<WriteCall>>,
}

impl PartitionedWriter for RecordingWriter {
    fn write<R: TableRecord>(
        &self,
        rows: &[R],
        path: &Path,
        mode: WriteMode,
    ) -> Result<TableWriteStats> {
        self.calls.lock().unwrap().push(WriteCall {
            table: R::TABLE.name,
            partition_columns: R::TABLE.partition_columns,
            rows: rows.len(),
            path: path.to_path_buf(),
            mode,
        });
        Ok(TableWriteStats {
            table: R::TABLE.name.to_string(),
            rows_written: rows.len(),
            files_written: 0,
            path: path.to_path_buf(),
        })
    }
}
