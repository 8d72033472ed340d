//! Per-date and per-run counters reported in logs and notifications.

use std::collections::BTreeMap;

/// Row counts for one processed date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateStats {
    pub raw_events: u64,
    pub events: u64,
    pub sessions: u64,
    pub profiles_new: u64,
    pub profiles_updated: u64,
}

impl DateStats {
    pub fn to_map(&self) -> BTreeMap<String, u64> {
        BTreeMap::from([
            ("raw_events".to_string(), self.raw_events),
            ("events".to_string(), self.events),
            ("sessions".to_string(), self.sessions),
            ("profiles_new".to_string(), self.profiles_new),
            ("profiles_updated".to_string(), self.profiles_updated),
        ])
    }
}

/// Accumulated counters for a whole run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub dates_processed: u64,
    pub dates_failed: u64,
    pub totals: DateStats,
}

impl RunSummary {
    pub fn absorb(&mut self, stats: &DateStats) {
        self.dates_processed += 1;
        self.totals.raw_events += stats.raw_events;
        self.totals.events += stats.events;
        self.totals.sessions += stats.sessions;
        self.totals.profiles_new += stats.profiles_new;
        self.totals.profiles_updated += stats.profiles_updated;
    }

    pub fn to_map(&self) -> BTreeMap<String, u64> {
        let mut map = self.totals.to_map();
        map.insert("dates_processed".to_string(), self.dates_processed);
        map.insert("dates_failed".to_string(), self.dates_failed);
        map
    }
}
