//! Output table definitions.
//!
//! Each dimension and fact row type declares its table name, its partition
//! columns, and how a batch of rows becomes a polars [`DataFrame`] with the
//! published column names.

use crate::constants::{columns::*, tables};
use crate::models::{ArtistDim, SongDim, SongplayFact, TimeDim, UserDim};
use polars::prelude::*;

/// Name and partitioning of one output table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub partition_columns: &'static [&'static str],
}

impl TableSpec {
    pub fn is_partitioned(&self) -> bool {
        !self.partition_columns.is_empty()
    }
}

/// A row type that can be written as a table
pub trait TableRecord: Send + Sync + 'static {
    const TABLE: TableSpec;

    /// Value of a partition column for this row; `None` for null
    fn partition_value(&self, column: &str) -> Option<String>;

    /// Columnar form of a batch of rows, including partition columns
    fn to_frame(rows: &[&Self]) -> PolarsResult<DataFrame>;
}

fn strings<R>(rows: &[&R], field: impl Fn(&R) -> &str) -> Vec<String> {
    rows.iter().map(|row| field(row).to_string()).collect()
}

fn opt_strings<R>(rows: &[&R], field: impl Fn(&R) -> Option<&str>) -> Vec<Option<String>> {
    rows.iter().map(|row| field(row).map(str::to_string)).collect()
}

impl TableRecord for SongDim {
    const TABLE: TableSpec = TableSpec {
        name: tables::SONGS,
        partition_columns: &[YEAR, ARTIST_ID],
    };

    fn partition_value(&self, column: &str) -> Option<String> {
        match column {
            YEAR => Some(self.year.to_string()),
            ARTIST_ID => Some(self.artist_id.clone()),
            _ => None,
        }
    }

    fn to_frame(rows: &[&Self]) -> PolarsResult<DataFrame> {
        df!(
            SONG_ID => strings(rows, |r| r.song_id.as_str()),
            TITLE => opt_strings(rows, |r| r.title.as_deref()),
            ARTIST_ID => strings(rows, |r| r.artist_id.as_str()),
            YEAR => rows.iter().map(|r| r.year).collect::<Vec<i32>>(),
            DURATION => rows.iter().map(|r| r.duration).collect::<Vec<Option<f64>>>(),
        )
    }
}

impl TableRecord for ArtistDim {
    const TABLE: TableSpec = TableSpec {
        name: tables::ARTISTS,
        partition_columns: &[],
    };

    fn partition_value(&self, _column: &str) -> Option<String> {
        None
    }

    fn to_frame(rows: &[&Self]) -> PolarsResult<DataFrame> {
        df!(
            ARTIST_ID => strings(rows, |r| r.artist_id.as_str()),
            NAME => opt_strings(rows, |r| r.name.as_deref()),
            LOCATION => opt_strings(rows, |r| r.location.as_deref()),
            LATITUDE => rows.iter().map(|r| r.latitude).collect::<Vec<Option<f64>>>(),
            LONGITUDE => rows.iter().map(|r| r.longitude).collect::<Vec<Option<f64>>>(),
        )
    }
}

impl TableRecord for UserDim {
    const TABLE: TableSpec = TableSpec {
        name: tables::USERS,
        partition_columns: &[],
    };

    fn partition_value(&self, _column: &str) -> Option<String> {
        None
    }

    fn to_frame(rows: &[&Self]) -> PolarsResult<DataFrame> {
        df!(
            USER_ID => strings(rows, |r| r.user_id.as_str()),
            LEVEL => opt_strings(rows, |r| r.level.as_deref()),
            FIRST_NAME => opt_strings(rows, |r| r.first_name.as_deref()),
            LAST_NAME => opt_strings(rows, |r| r.last_name.as_deref()),
            GENDER => opt_strings(rows, |r| r.gender.as_deref()),
        )
    }
}

impl TableRecord for TimeDim {
    const TABLE: TableSpec = TableSpec {
        name: tables::TIME,
        partition_columns: &[YEAR, MONTH],
    };

    fn partition_value(&self, column: &str) -> Option<String> {
        match column {
            YEAR => Some(self.year.to_string()),
            MONTH => Some(self.month.to_string()),
            _ => None,
        }
    }

    fn to_frame(rows: &[&Self]) -> PolarsResult<DataFrame> {
        let ints = |field: fn(&TimeDim) -> i32| rows.iter().map(|r| field(r)).collect::<Vec<i32>>();
        df!(
            START_TIME => strings(rows, |r| r.start_time.as_str()),
            HOUR => ints(|r| r.hour),
            DAY => ints(|r| r.day),
            WEEK => ints(|r| r.week),
            MONTH => ints(|r| r.month),
            YEAR => ints(|r| r.year),
            WEEKDAY => ints(|r| r.weekday),
        )
    }
}

impl TableRecord for SongplayFact {
    const TABLE: TableSpec = TableSpec {
        name: tables::SONGPLAYS,
        partition_columns: &[YEAR, MONTH],
    };

    fn partition_value(&self, column: &str) -> Option<String> {
        match column {
            YEAR => Some(self.year.to_string()),
            MONTH => Some(self.month.to_string()),
            _ => None,
        }
    }

    fn to_frame(rows: &[&Self]) -> PolarsResult<DataFrame> {
        df!(
            SONGPLAY_ID => rows.iter().map(|r| r.songplay_id).collect::<Vec<i64>>(),
            START_TIME => strings(rows, |r| r.start_time.as_str()),
            USER_ID => strings(rows, |r| r.user_id.as_str()),
            LEVEL => opt_strings(rows, |r| r.level.as_deref()),
            SONG_ID => strings(rows, |r| r.song_id.as_str()),
            ARTIST_ID => strings(rows, |r| r.artist_id.as_str()),
            SESSION_ID => rows.iter().map(|r| r.session_id).collect::<Vec<i64>>(),
            LOCATION => opt_strings(rows, |r| r.location.as_deref()),
            USER_AGENT => opt_strings(rows, |r| r.user_agent.as_deref()),
            YEAR => rows.iter().map(|r| r.year).collect::<Vec<i32>>(),
            MONTH => rows.iter().map(|r| r.month).collect::<Vec<i32>>(),
        )
    }
}
