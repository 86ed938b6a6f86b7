//! Star schema transformations.
//!
//! Pure functions from conformed source records to dimension and fact rows.
//! Nothing here touches the filesystem; the processor feeds loaded records
//! in and hands the resulting tables to the writer.

pub mod songplays;
pub mod songs;
pub mod temporal;
pub mod time;
pub mod users;

use crate::context::ExecutionContext;
use crate::models::{ArtistDim, EnrichedLogEvent, RawSongRecord, SongDim, SongplayFact, TimeDim, UserDim};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

/// Keep the first item for every distinct key, preserving input order
pub(crate) fn distinct_by<T, K, I, F>(items: I, key: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// All five output tables of one run
#[derive(Debug, Default)]
pub struct StarSchema {
    pub songs: Vec<SongDim>,
    pub artists: Vec<ArtistDim>,
    pub users: Vec<UserDim>,
    pub time: Vec<TimeDim>,
    pub songplays: Vec<SongplayFact>,
}

impl StarSchema {
    /// Build every table from the song catalog and the enriched song plays
    pub fn build(
        ctx: &ExecutionContext,
        catalog: &[RawSongRecord],
        events: &[EnrichedLogEvent],
    ) -> Self {
        let schema = Self {
            songs: songs::build_songs(catalog),
            artists: songs::build_artists(catalog),
            users: users::resolve_users(events, ctx.config().user_snapshot),
            time: time::build_time(events),
            songplays: songplays::assemble_songplays(events, catalog, ctx.songplay_keys()),
        };

        debug!(
            "Built star schema: {} songs, {} artists, {} users, {} time rows, {} songplays",
            schema.songs.len(),
            schema.artists.len(),
            schema.users.len(),
            schema.time.len(),
            schema.songplays.len()
        );

        schema
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{EnrichedLogEvent, RawLogEvent, RawSongRecord};
    use crate::transform::temporal::enrich;

    pub fn song(song_id: &str, title: &str, artist_id: &str, year: i32) -> RawSongRecord {
        RawSongRecord {
            song_id: song_id.to_string(),
            title: Some(title.to_string()),
            artist_id: artist_id.to_string(),
            artist_name: Some("Artist".to_string()),
            artist_location: None,
            artist_latitude: None,
            artist_longitude: None,
            duration: Some(180.0),
            year: Some(year),
            num_songs: Some(1),
        }
    }

    pub fn log_event(user_id: &str, level: &str, song: &str, ts: i64) -> RawLogEvent {
        RawLogEvent {
            user_id: user_id.to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            gender: Some("F".to_string()),
            level: Some(level.to_string()),
            page: Some("NextSong".to_string()),
            song: Some(song.to_string()),
            artist: None,
            length: Some(180.0),
            session_id: 100,
            item_in_session: Some(0),
            location: Some("X".to_string()),
            user_agent: Some("UA".to_string()),
            registration: None,
            ts,
            auth: Some("Logged In".to_string()),
            method: Some("PUT".to_string()),
            status: Some(200),
        }
    }

    pub fn enriched_event(user_id: &str, level: &str, song: &str, ts: i64) -> EnrichedLogEvent {
        enrich(log_event(user_id, level, song, ts)).expect("test ts in range")
    }
}
