//! Application constants for the songplay ETL
//!
//! Source layout defaults, table and column names, and the Hive
//! partitioning conventions used by the writer.

// =============================================================================
// Source Layout
// =============================================================================

/// Song catalog files, relative to the input root (song_data/A/B/C/TR*.json)
pub const DEFAULT_SONG_DATA_PATTERN: &str = "song_data/*/*/*/*.json";

/// Activity log files, relative to the input root (log_data/2018/11/*.json)
pub const DEFAULT_LOG_DATA_PATTERN: &str = "log_data/*/*/*.json";

/// Log page value that marks an actual song play
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// Output directory name used when no output root is given
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "output";

// =============================================================================
// Temporal Rendering
// =============================================================================

/// Fixed-width rendering of an instant; sorts lexicographically in time order
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// =============================================================================
// Table Names
// =============================================================================

pub mod tables {
    pub const SONGS: &str = "songs";
    pub const ARTISTS: &str = "artists";
    pub const USERS: &str = "users";
    pub const TIME: &str = "time";
    pub const SONGPLAYS: &str = "songplays";
}

// =============================================================================
// Column Names
// =============================================================================

pub mod columns {
    pub const SONG_ID: &str = "song_id";
    pub const TITLE: &str = "title";
    pub const ARTIST_ID: &str = "artist_id";
    pub const YEAR: &str = "year";
    pub const DURATION: &str = "duration";

    pub const NAME: &str = "name";
    pub const LOCATION: &str = "location";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";

    pub const USER_ID: &str = "userId";
    pub const LEVEL: &str = "level";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const GENDER: &str = "gender";

    pub const START_TIME: &str = "start_time";
    pub const HOUR: &str = "hour";
    pub const DAY: &str = "day";
    pub const WEEK: &str = "week";
    pub const MONTH: &str = "month";
    pub const WEEKDAY: &str = "weekday";

    pub const SONGPLAY_ID: &str = "songplay_id";
    pub const SESSION_ID: &str = "sessionId";
    pub const USER_AGENT: &str = "userAgent";
}

// =============================================================================
// Hive Partitioning
// =============================================================================

/// Directory value used for a null partition key
pub const HIVE_DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Marker file written once a table directory is complete
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// File extension for data files
pub const PARQUET_EXTENSION: &str = "parquet";
