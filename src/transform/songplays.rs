//! Songplay fact table.
//!
//! Log events are inner-joined to the raw catalog on `song == title`. A title
//! shared by several catalog entries yields one fact row per entry.

use crate::context::SurrogateKeyAllocator;
use crate::models::{EnrichedLogEvent, RawSongRecord, SongplayFact};
use chrono::Datelike;
use std::collections::HashMap;

pub fn assemble_songplays(
    events: &[EnrichedLogEvent],
    catalog: &[RawSongRecord],
    keys: &SurrogateKeyAllocator,
) -> Vec<SongplayFact> {
    let mut by_title: HashMap<&str, Vec<&RawSongRecord>> = HashMap::new();
    for record in catalog {
        if let Some(title) = record.title.as_deref() {
            by_title.entry(title).or_default().push(record);
        }
    }

    let mut facts = Vec::new();
    for enriched in events {
        let Some(matches) = enriched
            .event
            .song
            .as_deref()
            .and_then(|song| by_title.get(song))
        else {
            continue;
        };

        for song in matches {
            let event = &enriched.event;
            facts.push(SongplayFact {
                songplay_id: keys.next_key(),
                start_time: enriched.start_time.clone(),
                user_id: event.user_id.clone(),
                level: event.level.clone(),
                song_id: song.song_id.clone(),
                artist_id: song.artist_id.clone(),
                session_id: event.session_id,
                location: event.location.clone(),
                user_agent: event.user_agent.clone(),
                year: enriched.timestamp.year(),
                month: enriched.timestamp.month() as i32,
            });
        }
    }

    facts
}
