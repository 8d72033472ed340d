//! Mock source and sink for driving the pipeline without ClickHouse.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use etl_core::{Error, EventRecord, ProfileSplit, RawEvent, Result, SessionRecord};
use pipeline::{EventSink, EventSource};

/// Mock source serving canned raw events per date.
#[derive(Clone, Default)]
pub struct MockSource {
    batches: Arc<Mutex<HashMap<NaiveDate, Vec<RawEvent>>>>,
    fail_dates: Arc<Mutex<HashSet<NaiveDate>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, date: NaiveDate, events: Vec<RawEvent>) {
        self.batches.lock().insert(date, events);
    }

    /// Make extraction fail for one date.
    pub fn fail_on(&self, date: NaiveDate) {
        self.fail_dates.lock().insert(date);
    }
}

#[async_trait]
impl EventSource for MockSource {
    async fn fetch_raw_events(&self, date: NaiveDate) -> Result<Vec<RawEvent>> {
        if self.fail_dates.lock().contains(&date) {
            return Err(Error::extract("mock source failure"));
        }
        Ok(self.batches.lock().get(&date).cloned().unwrap_or_default())
    }
}

/// Mock sink capturing every write in memory.
#[derive(Clone, Default)]
pub struct MockSink {
    events: Arc<Mutex<HashMap<NaiveDate, Vec<EventRecord>>>>,
    sessions: Arc<Mutex<HashMap<NaiveDate, Vec<SessionRecord>>>>,
    profiles: Arc<Mutex<Vec<ProfileSplit>>>,
    known_ids: Arc<Mutex<HashSet<String>>>,
    write_calls: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a stored profile id.
    pub fn seed_profile(&self, pseudo_id: &str) {
        self.known_ids.lock().insert(pseudo_id.to_string());
    }

    /// Simulate load failures.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    pub fn events_for(&self, date: NaiveDate) -> Vec<EventRecord> {
        self.events.lock().get(&date).cloned().unwrap_or_default()
    }

    pub fn sessions_for(&self, date: NaiveDate) -> Vec<SessionRecord> {
        self.sessions.lock().get(&date).cloned().unwrap_or_default()
    }

    pub fn profile_writes(&self) -> Vec<ProfileSplit> {
        self.profiles.lock().clone()
    }

    /// Total count of sink write calls across all tables.
    pub fn write_call_count(&self) -> usize {
        *self.write_calls.lock()
    }

    fn check_failure(&self) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(Error::load("mock sink failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl EventSink for MockSink {
    async fn replace_events_partition(
        &self,
        date: NaiveDate,
        rows: &[EventRecord],
    ) -> Result<usize> {
        self.check_failure()?;
        *self.write_calls.lock() += 1;
        self.events.lock().insert(date, rows.to_vec());
        Ok(rows.len())
    }

    async fn replace_sessions_partition(
        &self,
        date: NaiveDate,
        rows: &[SessionRecord],
    ) -> Result<usize> {
        self.check_failure()?;
        *self.write_calls.lock() += 1;
        self.sessions.lock().insert(date, rows.to_vec());
        Ok(rows.len())
    }

    async fn existing_profile_ids(&self, ids: &[String]) -> Result<HashSet<String>> {
        self.check_failure()?;
        let known = self.known_ids.lock();
        Ok(ids.iter().filter(|id| known.contains(*id)).cloned().collect())
    }

    async fn upsert_profiles(&self, split: &ProfileSplit) -> Result<usize> {
        self.check_failure()?;
        *self.write_calls.lock() += 1;
        // New profiles become known, mirroring the real sink.
        let mut known = self.known_ids.lock();
        for profile in &split.new {
            known.insert(profile.user_pseudo_id.clone());
        }
        self.profiles.lock().push(split.clone());
        Ok(split.len())
    }
}
