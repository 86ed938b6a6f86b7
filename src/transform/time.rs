//! Time dimension: one calendar row per distinct `start_time`.

use crate::models::{EnrichedLogEvent, TimeDim};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::BTreeMap;

/// Calendar breakdown of an instant
pub fn calendar_row(start_time: &str, instant: &DateTime<Utc>) -> TimeDim {
    TimeDim {
        start_time: start_time.to_string(),
        hour: instant.hour() as i32,
        day: instant.day() as i32,
        week: instant.iso_week().week() as i32,
        month: instant.month() as i32,
        year: instant.year(),
        weekday: instant.weekday().num_days_from_monday() as i32,
    }
}

/// Rows come out ordered by `start_time`
pub fn build_time(events: &[EnrichedLogEvent]) -> Vec<TimeDim> {
    let distinct: BTreeMap<&str, &DateTime<Utc>> = events
        .iter()
        .map(|event| (event.start_time.as_str(), &event.timestamp))
        .collect();

    distinct
        .into_iter()
        .map(|(start_time, instant)| calendar_row(start_time, instant))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::enriched_event;

    #[test]
    fn test_calendar_fields() {
        let event = enriched_event("1", "free", "Test Song", 1_540_000_000_000);
        let rows = build_time(&[event]);

        assert_eq!(
            rows,
            vec![TimeDim {
                start_time: "2018-10-20 01:46:40.000000".to_string(),
                hour: 1,
                day: 20,
                week: 42,
                month: 10,
                year: 2018,
                weekday: 5,
            }]
        );
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // 2018-12-31 is a Monday in ISO week 1 of 2019
        let event = enriched_event("1", "free", "Song", 1_546_214_400_000);
        let row = &build_time(&[event])[0];

        assert_eq!(row.year, 2018);
        assert_eq!(row.month, 12);
        assert_eq!(row.week, 1);
        assert_eq!(row.weekday, 0);
    }

    #[test]
    fn test_distinct_and_sorted() {
        let events = vec![
            enriched_event("1", "free", "A", 3_000),
            enriched_event("2", "paid", "B", 1_000),
            enriched_event("3", "free", "C", 3_000),
        ];

        let rows = build_time(&events);
        let starts: Vec<_> = rows.iter().map(|r| r.start_time.as_str()).collect();
        assert_eq!(
            starts,
            vec!["1970-01-01 00:00:01.000000", "1970-01-01 00:00:03.000000"]
        );
    }
}
