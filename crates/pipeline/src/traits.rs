//! Seams between the runner and the warehouse.
//!
//! The runner only talks to these traits, so tests can drive it with
//! in-memory doubles and production wires in the ClickHouse client.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use etl_core::{EventRecord, ProfileSplit, RawEvent, Result, SessionRecord};

/// Raw event extraction for one calendar date.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_raw_events(&self, date: NaiveDate) -> Result<Vec<RawEvent>>;
}

/// Derived table writes.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Replaces the events partition for `date`.
    async fn replace_events_partition(
        &self,
        date: NaiveDate,
        rows: &[EventRecord],
    ) -> Result<usize>;

    /// Replaces the sessions partition for `date`.
    async fn replace_sessions_partition(
        &self,
        date: NaiveDate,
        rows: &[SessionRecord],
    ) -> Result<usize>;

    /// Returns which of `ids` already have a stored profile.
    async fn existing_profile_ids(&self, ids: &[String]) -> Result<HashSet<String>>;

    /// Appends new profiles and merges updated ones.
    async fn upsert_profiles(&self, split: &ProfileSplit) -> Result<usize>;
}
