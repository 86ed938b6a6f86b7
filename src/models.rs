//! Core data structures for the songplay star schema.
//!
//! Raw source records as they are deserialized from JSON, the enriched log
//! event, the four dimension rows, the fact row, and run statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One song catalog entry. `song_id` and `artist_id` are mandatory; a record
/// missing either fails to deserialize and is dropped by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSongRecord {
    pub song_id: String,
    pub title: Option<String>,
    pub artist_id: String,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    pub duration: Option<f64>,
    pub year: Option<i32>,
    pub num_songs: Option<i32>,
}

/// One user activity event from a line-delimited log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLogEvent {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub page: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: i64,
    pub item_in_session: Option<i32>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub registration: Option<f64>,
    /// Epoch milliseconds
    pub ts: i64,
    pub auth: Option<String>,
    pub method: Option<String>,
    pub status: Option<i32>,
}

impl RawLogEvent {
    /// Whether this event is an actual song play
    pub fn is_song_play(&self) -> bool {
        self.page.as_deref() == Some(crate::constants::NEXT_SONG_PAGE)
    }
}

/// A "NextSong" log event with its derived instant and display string
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedLogEvent {
    pub event: RawLogEvent,
    pub timestamp: DateTime<Utc>,
    pub start_time: String,
}

/// A catalog song with a known, non-zero year
#[derive(Debug, Clone, PartialEq)]
pub struct SongDim {
    pub song_id: String,
    pub title: Option<String>,
    pub artist_id: String,
    pub year: i32,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistDim {
    pub artist_id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDim {
    pub user_id: String,
    pub level: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
}

/// Calendar breakdown of one distinct `start_time`.
/// `weekday` counts from Monday = 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDim {
    pub start_time: String,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub month: i32,
    pub year: i32,
    pub weekday: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongplayFact {
    pub songplay_id: i64,
    pub start_time: String,
    pub user_id: String,
    pub level: Option<String>,
    pub song_id: String,
    pub artist_id: String,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub year: i32,
    pub month: i32,
}

/// Outcome of loading one source tree
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub files_read: usize,
    pub records_parsed: usize,
    pub records_dropped: usize,
}

/// Rows and files produced for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWriteStats {
    pub table: String,
    pub rows_written: usize,
    pub files_written: usize,
    pub path: PathBuf,
}

/// Processing statistics for a complete run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub run_id: String,
    pub songs: LoadStats,
    pub logs: LoadStats,
    pub events_filtered: usize,
    pub events_bad_timestamp: usize,
    pub tables: Vec<TableWriteStats>,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

impl RunSummary {
    /// Rows written for a table, if it was written in this run
    pub fn rows_for(&self, table: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|t| t.table == table)
            .map(|t| t.rows_written)
    }
}
