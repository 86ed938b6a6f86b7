//! Users dimension: latest-activity-wins profile snapshots.

use crate::config::UserSnapshotStrategy;
use crate::models::{EnrichedLogEvent, UserDim};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Resolve one profile row per (userId, level).
///
/// With [`UserSnapshotStrategy::LatestPerUser`] only events at the user's
/// overall latest timestamp qualify; with
/// [`UserSnapshotStrategy::LatestPerLevel`] the latest timestamp is taken per
/// (userId, level). Remaining ties keep the first event in input order.
pub fn resolve_users(events: &[EnrichedLogEvent], strategy: UserSnapshotStrategy) -> Vec<UserDim> {
    let snapshot_key = |event: &EnrichedLogEvent| -> (String, Option<String>) {
        match strategy {
            UserSnapshotStrategy::LatestPerUser => (event.event.user_id.clone(), None),
            UserSnapshotStrategy::LatestPerLevel => {
                (event.event.user_id.clone(), event.event.level.clone())
            }
        }
    };

    let mut latest: HashMap<(String, Option<String>), DateTime<Utc>> = HashMap::new();
    for event in events {
        latest
            .entry(snapshot_key(event))
            .and_modify(|max| *max = (*max).max(event.timestamp))
            .or_insert(event.timestamp);
    }

    let mut seen: HashSet<(&str, Option<&str>)> = HashSet::new();
    let mut users = Vec::new();

    for enriched in events {
        if latest.get(&snapshot_key(enriched)) != Some(&enriched.timestamp) {
            continue;
        }
        let event = &enriched.event;
        if !seen.insert((event.user_id.as_str(), event.level.as_deref())) {
            continue;
        }
        users.push(UserDim {
            user_id: event.user_id.clone(),
            level: event.level.clone(),
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            gender: event.gender.clone(),
        });
    }

    users
}
