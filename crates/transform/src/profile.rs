//! User profile aggregation with new/updated split.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use etl_core::{EventRecord, ProfileRecord, ProfileSplit};
use tracing::debug;

struct UserGroup {
    first_seen: i64,
    last_seen: i64,
    event_count: u64,
    sessions: HashSet<String>,
    devices: ModeCounter,
    oses: ModeCounter,
    countries: ModeCounter,
}

/// Frequency counter with a deterministic tie-break: among values
/// sharing the maximum count, the one that first appeared earliest in
/// the input wins.
#[derive(Default)]
struct ModeCounter {
    counts: HashMap<String, (u64, usize)>,
    observed: usize,
}

impl ModeCounter {
    fn observe(&mut self, value: &str) {
        let next_rank = self.observed;
        let entry = self
            .counts
            .entry(value.to_owned())
            .or_insert((0, next_rank));
        entry.0 += 1;
        self.observed += 1;
    }

    fn mode(&self) -> Option<String> {
        self.counts
            .iter()
            .max_by(|(_, (ca, ra)), (_, (cb, rb))| ca.cmp(cb).then(rb.cmp(ra)))
            .map(|(value, _)| value.clone())
    }
}

/// Groups rows by pseudo id and reduces each group to one profile
/// row, split into new vs updated by `existing_ids` (the set of
/// pseudo ids already stored in the sink).
///
/// Updated rows carry `first_seen: None` so the sink merge leaves the
/// stored first-seen timestamp untouched. Mode columns with no
/// observed value in the group stay absent.
pub fn aggregate(rows: &[EventRecord], existing_ids: &HashSet<String>) -> ProfileSplit {
    if rows.is_empty() {
        debug!("aggregate called with empty batch");
        return ProfileSplit::default();
    }

    // Encounter-order grouping keeps output ordering and mode
    // tie-breaks reproducible for a given input.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    let mut groups: Vec<UserGroup> = Vec::new();

    for row in rows {
        let g = match index.get(row.user_pseudo_id.as_str()) {
            Some(&g) => g,
            None => {
                index.insert(&row.user_pseudo_id, groups.len());
                order.push(&row.user_pseudo_id);
                groups.push(UserGroup {
                    first_seen: row.timestamp,
                    last_seen: row.timestamp,
                    event_count: 0,
                    sessions: HashSet::new(),
                    devices: ModeCounter::default(),
                    oses: ModeCounter::default(),
                    countries: ModeCounter::default(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[g];
        group.first_seen = group.first_seen.min(row.timestamp);
        group.last_seen = group.last_seen.max(row.timestamp);
        group.event_count += 1;
        if let Some(ref session_id) = row.ga_session_id {
            group.sessions.insert(session_id.clone());
        }
        if let Some(ref device) = row.device_category {
            group.devices.observe(device);
        }
        if let Some(ref os) = row.device_operating_system {
            group.oses.observe(os);
        }
        if let Some(ref country) = row.geo_country {
            group.countries.observe(country);
        }
    }

    let now = Utc::now().timestamp_micros();
    let mut split = ProfileSplit::default();

    for (pseudo_id, group) in order.into_iter().zip(groups) {
        let is_update = existing_ids.contains(pseudo_id);
        let profile = ProfileRecord {
            user_pseudo_id: pseudo_id.to_owned(),
            // first_seen is write-once: omitted from update payloads.
            first_seen: (!is_update).then_some(group.first_seen),
            last_seen: group.last_seen,
            session_count: group.sessions.len() as u64,
            event_count: group.event_count,
            most_used_device: group.devices.mode(),
            most_used_os: group.oses.mode(),
            country: group.countries.mode(),
            last_updated: now,
        };
        if is_update {
            split.updated.push(profile);
        } else {
            split.new.push(profile);
        }
    }

    split
}
