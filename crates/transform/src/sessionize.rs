//! Session summarization: flat rows to per-visit summaries.

use std::collections::HashMap;

use etl_core::{EventRecord, Error, Result, SessionRecord};
use tracing::{debug, warn};

use crate::flatten::PAGE_VIEW;

struct SessionGroup {
    first_row: usize,
    start: i64,
    end: i64,
    pageviews: u64,
    engagement_time_msec: i64,
}

/// Groups rows by (pseudo id, session id) and reduces each group to
/// one summary row.
///
/// First-event attributes come from the group's first row in
/// encounter order, not a timestamp sort; callers that need a
/// chronological "first" must pre-sort the input by timestamp (the
/// pipeline does). Rows without a `ga_session_id` are excluded from
/// grouping; if a non-empty input has no session key on any row the
/// whole call fails with [`Error::MissingSessionKey`] rather than
/// returning partial data.
pub fn sessionize(rows: &[EventRecord]) -> Result<Vec<SessionRecord>> {
    if rows.is_empty() {
        debug!("sessionize called with empty batch");
        return Ok(Vec::new());
    }

    if rows.iter().all(|r| r.ga_session_id.is_none()) {
        return Err(Error::MissingSessionKey);
    }

    // Group in encounter order so output ordering and first-row
    // selection are deterministic for a given input.
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<SessionGroup> = Vec::new();
    let mut skipped = 0usize;

    for (i, row) in rows.iter().enumerate() {
        let Some(ref session_id) = row.ga_session_id else {
            skipped += 1;
            continue;
        };

        let key = (row.user_pseudo_id.as_str(), session_id.as_str());
        let engagement = row.engagement_time_msec.unwrap_or(0);
        let is_pageview = row.event_name == PAGE_VIEW;

        match index.get(&key) {
            Some(&g) => {
                let group = &mut groups[g];
                group.start = group.start.min(row.timestamp);
                group.end = group.end.max(row.timestamp);
                group.pageviews += u64::from(is_pageview);
                group.engagement_time_msec += engagement;
            }
            None => {
                index.insert(key, groups.len());
                groups.push(SessionGroup {
                    first_row: i,
                    start: row.timestamp,
                    end: row.timestamp,
                    pageviews: u64::from(is_pageview),
                    engagement_time_msec: engagement,
                });
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "rows without ga_session_id excluded from sessionization");
    }

    let sessions = groups
        .into_iter()
        .map(|group| {
            let first = &rows[group.first_row];
            // Both bounds come from the same min/max scan, so the
            // duration cannot go negative.
            let duration = (group.end - group.start) as f64 / 1_000_000.0;
            SessionRecord {
                user_pseudo_id: first.user_pseudo_id.clone(),
                ga_session_id: first
                    .ga_session_id
                    .clone()
                    .unwrap_or_default(),
                session_start_time: group.start,
                session_end_time: group.end,
                session_duration_seconds: duration,
                pageviews: group.pageviews,
                engagement_time_msec: group.engagement_time_msec,
                referrer: first.page_referrer.clone(),
                device_category: first.device_category.clone(),
                operating_system: first.device_operating_system.clone(),
                country: first.geo_country.clone(),
                city: first.geo_city.clone(),
                traffic_source: first.traffic_source_source.clone(),
                traffic_medium: first.traffic_source_medium.clone(),
                date: first.date,
            }
        })
        .collect();

    Ok(sessions)
}
