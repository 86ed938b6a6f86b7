//! Song and artist dimensions.
//!
//! Both are distinct projections of the raw catalog. Songs without a known
//! year (null, or 0 which the catalog uses for "unknown") are excluded.

use super::distinct_by;
use crate::models::{ArtistDim, RawSongRecord, SongDim};

pub fn build_songs(catalog: &[RawSongRecord]) -> Vec<SongDim> {
    let projected = catalog.iter().filter_map(|record| {
        let year = record.year.filter(|year| *year != 0)?;
        Some(SongDim {
            song_id: record.song_id.clone(),
            title: record.title.clone(),
            artist_id: record.artist_id.clone(),
            year,
            duration: record.duration,
        })
    });

    distinct_by(projected, |song| {
        (
            song.song_id.clone(),
            song.title.clone(),
            song.artist_id.clone(),
            song.year,
            song.duration.map(f64::to_bits),
        )
    })
}

pub fn build_artists(catalog: &[RawSongRecord]) -> Vec<ArtistDim> {
    let projected = catalog.iter().map(|record| ArtistDim {
        artist_id: record.artist_id.clone(),
        name: record.artist_name.clone(),
        location: record.artist_location.clone(),
        latitude: record.artist_latitude,
        longitude: record.artist_longitude,
    });

    distinct_by(projected, |artist| {
        (
            artist.artist_id.clone(),
            artist.name.clone(),
            artist.location.clone(),
            artist.latitude.map(f64::to_bits),
            artist.longitude.map(f64::to_bits),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::song;

    #[test]
    fn test_unknown_year_is_excluded_from_songs_only() {
        let mut unknown = song("S2", "Old Tune", "A2", 0);
        unknown.artist_name = Some("Forgotten".to_string());
        let mut null_year = song("S3", "No Year", "A3", 1999);
        null_year.year = None;
        let catalog = vec![song("S1", "Test Song", "A1", 2000), unknown, null_year];

        let songs = build_songs(&catalog);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].song_id, "S1");
        assert!(songs.iter().all(|s| s.year != 0));

        let artists = build_artists(&catalog);
        assert_eq!(artists.len(), 3);
        assert!(artists.iter().any(|a| a.artist_id == "A2"
            && a.name.as_deref() == Some("Forgotten")));
    }

    #[test]
    fn test_duplicates_collapse_on_projected_fields() {
        let first = song("S1", "Test Song", "A1", 2000);
        let mut same_projection = first.clone();
        same_projection.num_songs = Some(7);
        same_projection.artist_location = Some("Elsewhere".to_string());

        let songs = build_songs(&[first.clone(), same_projection.clone()]);
        assert_eq!(songs.len(), 1);

        // Artist tuple differs in location, so both artist rows survive
        let artists = build_artists(&[first, same_projection]);
        assert_eq!(artists.len(), 2);
    }

    #[test]
    fn test_distinct_keeps_first_occurrence_order() {
        let catalog = vec![
            song("S2", "B", "A1", 2001),
            song("S1", "A", "A1", 2000),
            song("S2", "B", "A1", 2001),
        ];

        let ids: Vec<_> = build_songs(&catalog)
            .into_iter()
            .map(|s| s.song_id)
            .collect();
        assert_eq!(ids, vec!["S2", "S1"]);
    }

    #[test]
    fn test_different_duration_is_a_different_song_row() {
        let mut longer = song("S1", "Test Song", "A1", 2000);
        longer.duration = Some(181.5);
        let songs = build_songs(&[song("S1", "Test Song", "A1", 2000), longer]);
        assert_eq!(songs.len(), 2);
    }
}
