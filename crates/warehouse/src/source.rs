//! Raw event extraction from the GA4 export tables.

use chrono::NaiveDate;
use clickhouse::Row;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::WarehouseClient;
use etl_core::dates::partition_suffix;
use etl_core::{RawEvent, Result};

/// Wire row from the raw export. Nested groups arrive as JSON string
/// columns and are decoded per row.
#[derive(Debug, Clone, Row, Deserialize)]
pub struct RawEventRow {
    pub event_date: String,
    pub event_timestamp: i64,
    pub event_name: String,
    pub user_id: Option<String>,
    pub user_pseudo_id: String,
    pub platform: Option<String>,
    pub event_params: String,
    pub user_properties: String,
    pub device: String,
    pub geo: String,
    pub traffic_source: String,
    pub items: String,
}

fn parse_column<T>(raw: &str, column: &str, pseudo_id: &str) -> T
where
    T: Default + DeserializeOwned,
{
    if raw.is_empty() || raw == "null" {
        return T::default();
    }
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            // Malformed nested data degrades to absent, the row itself
            // is kept.
            warn!(
                column = column,
                user_pseudo_id = pseudo_id,
                error = %e,
                "Dropping malformed nested column"
            );
            T::default()
        }
    }
}

impl RawEventRow {
    fn into_event(self) -> RawEvent {
        let pseudo_id = self.user_pseudo_id.clone();
        RawEvent {
            event_date: self.event_date,
            event_timestamp: self.event_timestamp,
            event_name: self.event_name,
            user_id: self.user_id,
            user_pseudo_id: self.user_pseudo_id,
            platform: self.platform,
            event_params: parse_column(&self.event_params, "event_params", &pseudo_id),
            user_properties: parse_column(&self.user_properties, "user_properties", &pseudo_id),
            device: parse_column(&self.device, "device", &pseudo_id),
            geo: parse_column(&self.geo, "geo", &pseudo_id),
            traffic_source: parse_column(&self.traffic_source, "traffic_source", &pseudo_id),
            items: parse_column(&self.items, "items", &pseudo_id),
        }
    }
}

/// Fetches all raw events for one calendar date.
///
/// The export keys rows by the compact `YYYYMMDD` date string, so the
/// date is converted to that form for the predicate. An empty result
/// is not an error.
pub async fn fetch_raw_events(client: &WarehouseClient, date: NaiveDate) -> Result<Vec<RawEvent>> {
    let suffix = partition_suffix(date);
    let sql = format!(
        "SELECT event_date, event_timestamp, event_name, user_id, user_pseudo_id, \
         platform, event_params, user_properties, device, geo, traffic_source, items \
         FROM {} WHERE event_date = ? ORDER BY event_timestamp",
        client.raw_events_table()
    );

    let rows: Vec<RawEventRow> = client
        .inner()
        .query(&sql)
        .bind(&suffix)
        .fetch_all()
        .await
        .map_err(|e| etl_core::Error::extract(format!("Raw event fetch failed: {}", e)))?;

    debug!(date = %date, count = rows.len(), "Fetched raw events");

    Ok(rows.into_iter().map(RawEventRow::into_event).collect())
}
