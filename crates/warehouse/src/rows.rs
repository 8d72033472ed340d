//! Row types for ClickHouse insertion.
//!
//! Mirrors of the derived record types with wire-level column types:
//! `Date` columns as days since epoch, `DateTime64(6)` as i64
//! microseconds, booleans as `Nullable(UInt8)`.

use chrono::{Datelike, NaiveDate};
use clickhouse::Row;
use serde::Serialize;

use etl_core::{EventRecord, ProfileRecord, SessionRecord};

// Days from CE to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn days_since_epoch(date: NaiveDate) -> u16 {
    (date.num_days_from_ce() - EPOCH_DAYS_FROM_CE).max(0) as u16
}

fn bool_to_u8(value: Option<bool>) -> Option<u8> {
    value.map(|b| if b { 1 } else { 0 })
}

/// Flattened event row for the events table.
#[derive(Debug, Clone, Row, Serialize)]
pub struct EventRow {
    pub date: u16,
    pub timestamp: i64, // DateTime64(6) as microseconds
    pub event_name: String,
    pub user_id: Option<String>,
    pub user_pseudo_id: String,
    pub platform: Option<String>,

    pub device_category: Option<String>,
    pub device_mobile_brand_name: Option<String>,
    pub device_mobile_model_name: Option<String>,
    pub device_operating_system: Option<String>,
    pub device_language: Option<String>,

    pub geo_country: Option<String>,
    pub geo_region: Option<String>,
    pub geo_city: Option<String>,

    pub traffic_source_name: Option<String>,
    pub traffic_source_medium: Option<String>,
    pub traffic_source_source: Option<String>,

    pub page_location: Option<String>,
    pub page_title: Option<String>,
    pub page_referrer: Option<String>,
    pub session_id: Option<String>,
    pub session_engaged: Option<u8>,
    pub engagement_time_msec: Option<i64>,
    pub ga_session_id: Option<String>,
    pub ga_session_number: Option<i64>,

    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub link_classes: Option<String>,
    pub link_id: Option<String>,
    pub outbound: Option<u8>,

    pub percent_scrolled: Option<f64>,

    pub currency: Option<String>,
    pub value: Option<f64>,
    pub transaction_id: Option<String>,
    pub tax: Option<f64>,
    pub shipping: Option<f64>,
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub item_quantity: Option<i64>,
}

impl EventRow {
    /// Builds a row, falling back to `partition_date` when the record
    /// carries no parsable date. The fallback keeps every row inside
    /// the partition being replaced.
    pub fn from_record(record: &EventRecord, partition_date: NaiveDate) -> Self {
        Self {
            date: days_since_epoch(record.date.unwrap_or(partition_date)),
            timestamp: record.timestamp,
            event_name: record.event_name.clone(),
            user_id: record.user_id.clone(),
            user_pseudo_id: record.user_pseudo_id.clone(),
            platform: record.platform.clone(),

            device_category: record.device_category.clone(),
            device_mobile_brand_name: record.device_mobile_brand_name.clone(),
            device_mobile_model_name: record.device_mobile_model_name.clone(),
            device_operating_system: record.device_operating_system.clone(),
            device_language: record.device_language.clone(),

            geo_country: record.geo_country.clone(),
            geo_region: record.geo_region.clone(),
            geo_city: record.geo_city.clone(),

            traffic_source_name: record.traffic_source_name.clone(),
            traffic_source_medium: record.traffic_source_medium.clone(),
            traffic_source_source: record.traffic_source_source.clone(),

            page_location: record.page_location.clone(),
            page_title: record.page_title.clone(),
            page_referrer: record.page_referrer.clone(),
            session_id: record.session_id.clone(),
            session_engaged: bool_to_u8(record.session_engaged),
            engagement_time_msec: record.engagement_time_msec,
            ga_session_id: record.ga_session_id.clone(),
            ga_session_number: record.ga_session_number,

            link_url: record.link_url.clone(),
            link_text: record.link_text.clone(),
            link_classes: record.link_classes.clone(),
            link_id: record.link_id.clone(),
            outbound: bool_to_u8(record.outbound),

            percent_scrolled: record.percent_scrolled,

            currency: record.currency.clone(),
            value: record.value,
            transaction_id: record.transaction_id.clone(),
            tax: record.tax,
            shipping: record.shipping,
            item_id: record.item_id.clone(),
            item_name: record.item_name.clone(),
            item_quantity: record.item_quantity,
        }
    }
}

/// Session summary row for the sessions table.
#[derive(Debug, Clone, Row, Serialize)]
pub struct SessionRow {
    pub user_pseudo_id: String,
    pub ga_session_id: String,
    pub session_start_time: i64,
    pub session_end_time: i64,
    pub session_duration_seconds: f64,
    pub pageviews: u64,
    pub engagement_time_msec: i64,
    pub referrer: Option<String>,
    pub device_category: Option<String>,
    pub operating_system: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub traffic_source: Option<String>,
    pub traffic_medium: Option<String>,
    pub date: u16,
}

impl SessionRow {
    pub fn from_record(record: &SessionRecord, partition_date: NaiveDate) -> Self {
        Self {
            user_pseudo_id: record.user_pseudo_id.clone(),
            ga_session_id: record.ga_session_id.clone(),
            session_start_time: record.session_start_time,
            session_end_time: record.session_end_time,
            session_duration_seconds: record.session_duration_seconds,
            pageviews: record.pageviews,
            engagement_time_msec: record.engagement_time_msec,
            referrer: record.referrer.clone(),
            device_category: record.device_category.clone(),
            operating_system: record.operating_system.clone(),
            country: record.country.clone(),
            city: record.city.clone(),
            traffic_source: record.traffic_source.clone(),
            traffic_medium: record.traffic_medium.clone(),
            date: days_since_epoch(record.date.unwrap_or(partition_date)),
        }
    }
}

/// Profile row for the user_profiles table. Only new profiles are
/// appended as rows; updates go through mutations.
#[derive(Debug, Clone, Row, Serialize)]
pub struct ProfileRow {
    pub user_pseudo_id: String,
    pub first_seen: i64,
    pub last_seen: i64,
    pub session_count: u64,
    pub event_count: u64,
    pub most_used_device: Option<String>,
    pub most_used_os: Option<String>,
    pub country: Option<String>,
    pub last_updated: i64,
}

impl ProfileRow {
    pub fn from_record(record: &ProfileRecord) -> Self {
        Self {
            user_pseudo_id: record.user_pseudo_id.clone(),
            first_seen: record.first_seen.unwrap_or(record.last_seen),
            last_seen: record.last_seen,
            session_count: record.session_count,
            event_count: record.event_count,
            most_used_device: record.most_used_device.clone(),
            most_used_os: record.most_used_os.clone(),
            country: record.country.clone(),
            last_updated: record.last_updated,
        }
    }
}
