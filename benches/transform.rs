//! Star schema transform benchmark
//!
//! Measures building all five tables from in-memory catalog and log records,
//! without any file I/O.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use songplay_etl::models::{EnrichedLogEvent, RawLogEvent, RawSongRecord};
use songplay_etl::transform::temporal::enrich_song_plays;
use songplay_etl::{EtlConfig, ExecutionContext, StarSchema};

fn catalog(songs: usize) -> Vec<RawSongRecord> {
    (0..songs)
        .map(|i| RawSongRecord {
            song_id: format!("SO{:016}", i),
            title: Some(format!("Song {}", i % (songs / 2).max(1))),
            artist_id: format!("AR{:016}", i % 500),
            artist_name: Some(format!("Artist {}", i % 500)),
            artist_location: None,
            artist_latitude: None,
            artist_longitude: None,
            duration: Some(120.0 + (i % 240) as f64),
            year: Some(if i % 7 == 0 { 0 } else { 1960 + (i % 60) as i32 }),
            num_songs: Some(1),
        })
        .collect()
}

fn events(plays: usize, songs: usize) -> Vec<EnrichedLogEvent> {
    let raw = (0..plays)
        .map(|i| RawLogEvent {
            user_id: (i % 100).to_string(),
            first_name: Some("Kaylee".to_string()),
            last_name: Some("Summers".to_string()),
            gender: Some("F".to_string()),
            level: Some(if i % 3 == 0 { "paid" } else { "free" }.to_string()),
            page: Some(if i % 5 == 0 { "Home" } else { "NextSong" }.to_string()),
            song: Some(format!("Song {}", i % songs)),
            artist: None,
            length: None,
            session_id: (i / 20) as i64,
            item_in_session: Some((i % 20) as i32),
            location: Some("Phoenix-Mesa-Scottsdale, AZ".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            registration: None,
            ts: 1_541_000_000_000 + (i as i64) * 37_000,
            auth: Some("Logged In".to_string()),
            method: Some("PUT".to_string()),
            status: Some(200),
        })
        .collect();
    enrich_song_plays(raw).events
}

fn bench_star_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("star_schema");

    for &(songs, plays) in &[(1_000, 10_000), (10_000, 100_000)] {
        let catalog = catalog(songs);
        let events = events(plays, songs);

        group.bench_with_input(
            BenchmarkId::new("build", format!("{}x{}", songs, plays)),
            &(catalog, events),
            |b, (catalog, events)| {
                b.iter(|| {
                    let ctx = ExecutionContext::new(EtlConfig::default());
                    let schema = StarSchema::build(&ctx, black_box(catalog), black_box(events));
                    black_box(schema.songplays.len());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_star_schema);
criterion_main!(benches);
