//! Timestamp enrichment for log events.
//!
//! `ts` is epoch milliseconds interpreted as UTC. The derived `start_time`
//! string is fixed width so that string order equals time order.

use crate::constants::START_TIME_FORMAT;
use crate::models::{EnrichedLogEvent, RawLogEvent};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Instant for an epoch-millisecond value, `None` if chrono cannot represent it
pub fn to_instant(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts)
}

pub fn render_start_time(instant: &DateTime<Utc>) -> String {
    instant.format(START_TIME_FORMAT).to_string()
}

pub fn enrich(event: RawLogEvent) -> Option<EnrichedLogEvent> {
    let timestamp = to_instant(event.ts)?;
    let start_time = render_start_time(&timestamp);
    Some(EnrichedLogEvent {
        event,
        timestamp,
        start_time,
    })
}

/// Result of filtering and enriching a batch of log events
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    pub events: Vec<EnrichedLogEvent>,
    /// Events dropped because they were not song plays
    pub filtered: usize,
    /// Song plays dropped because `ts` is out of range
    pub bad_timestamp: usize,
}

/// Keep "NextSong" events and attach their derived time columns, in input order
pub fn enrich_song_plays(events: Vec<RawLogEvent>) -> EnrichmentOutcome {
    let mut outcome = EnrichmentOutcome::default();

    for event in events {
        if !event.is_song_play() {
            outcome.filtered += 1;
            continue;
        }
        let ts = event.ts;
        match enrich(event) {
            Some(enriched) => outcome.events.push(enriched),
            None => {
                debug!("Dropping song play with unrepresentable ts {}", ts);
                outcome.bad_timestamp += 1;
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::log_event;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_millis_are_divided_into_seconds() {
        let instant = to_instant(1_540_000_000_000).unwrap();
        assert_eq!(instant.timestamp(), 1_540_000_000);
        assert_eq!(instant.year(), 2018);
        assert_eq!(instant.month(), 10);
        assert_eq!(instant.day(), 20);
        assert_eq!(instant.hour(), 1);
    }

    #[test]
    fn test_start_time_rendering_keeps_milliseconds() {
        let instant = to_instant(1_542_241_826_796).unwrap();
        assert_eq!(render_start_time(&instant), "2018-11-15 00:30:26.796000");

        let whole_second = to_instant(1_540_000_000_000).unwrap();
        assert_eq!(render_start_time(&whole_second), "2018-10-20 01:46:40.000000");
    }

    #[test]
    fn test_start_time_sorts_chronologically() {
        let values = [0_i64, 999, 1_000, 59_999, 1_540_000_000_000, 1_542_241_826_796];
        let rendered: Vec<String> = values
            .iter()
            .map(|ts| render_start_time(&to_instant(*ts).unwrap()))
            .collect();

        let mut sorted = rendered.clone();
        sorted.sort();
        assert_eq!(rendered, sorted);
        assert_eq!(rendered[0], "1970-01-01 00:00:00.000000");
    }

    #[test]
    fn test_out_of_range_ts_is_none() {
        assert!(to_instant(i64::MAX).is_none());
    }

    #[test]
    fn test_only_next_song_events_are_enriched() {
        let mut home = log_event("1", "free", "Some Song", 1_000);
        home.page = Some("Home".to_string());
        let mut no_page = log_event("2", "free", "Some Song", 2_000);
        no_page.page = None;
        let play = log_event("3", "paid", "Some Song", 3_000);
        let mut broken = log_event("4", "paid", "Some Song", 0);
        broken.ts = i64::MAX;

        let outcome = enrich_song_plays(vec![home, no_page, play, broken]);

        assert_eq!(outcome.filtered, 2);
        assert_eq!(outcome.bad_timestamp, 1);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].event.user_id, "3");
        assert_eq!(outcome.events[0].start_time, "1970-01-01 00:00:03.000000");
    }
}
