//! ClickHouse bindings for the runner seams.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::traits::{EventSink, EventSource};
use etl_core::{EventRecord, ProfileSplit, RawEvent, Result, SessionRecord};
use warehouse_client::{sink, source, WarehouseClient};

#[async_trait]
impl EventSource for WarehouseClient {
    async fn fetch_raw_events(&self, date: NaiveDate) -> Result<Vec<RawEvent>> {
        source::fetch_raw_events(self, date).await
    }
}

#[async_trait]
impl EventSink for WarehouseClient {
    async fn replace_events_partition(
        &self,
        date: NaiveDate,
        rows: &[EventRecord],
    ) -> Result<usize> {
        sink::replace_events_partition(self, date, rows).await
    }

    async fn replace_sessions_partition(
        &self,
        date: NaiveDate,
        rows: &[SessionRecord],
    ) -> Result<usize> {
        sink::replace_sessions_partition(self, date, rows).await
    }

    async fn existing_profile_ids(&self, ids: &[String]) -> Result<HashSet<String>> {
        sink::existing_profile_ids(self, ids).await
    }

    async fn upsert_profiles(&self, split: &ProfileSplit) -> Result<usize> {
        sink::upsert_profiles(self, split).await
    }
}
