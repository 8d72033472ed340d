//! Derived record types produced by the transformation engine.
//!
//! Timestamps stay as microseconds since epoch end to end: the GA4
//! export delivers them that way, grouping arithmetic is exact on
//! i64, and the warehouse columns are DateTime64(6).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One flattened event row.
///
/// Common columns are always populated when the raw record carries
/// them; category columns are populated only for rows whose event
/// name belongs to the category. Absent means `None`, never a zero or
/// empty-string default. `timestamp` and `user_pseudo_id` are the
/// join keys for all downstream grouping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    // Common columns
    pub date: Option<NaiveDate>,
    pub timestamp: i64,
    pub event_name: String,
    pub user_id: Option<String>,
    pub user_pseudo_id: String,
    pub platform: Option<String>,

    // Device
    pub device_category: Option<String>,
    pub device_mobile_brand_name: Option<String>,
    pub device_mobile_model_name: Option<String>,
    pub device_operating_system: Option<String>,
    pub device_language: Option<String>,

    // Geo
    pub geo_country: Option<String>,
    pub geo_region: Option<String>,
    pub geo_city: Option<String>,

    // Traffic source
    pub traffic_source_name: Option<String>,
    pub traffic_source_medium: Option<String>,
    pub traffic_source_source: Option<String>,

    // Cross-event-type parameters
    pub page_location: Option<String>,
    pub page_title: Option<String>,
    pub page_referrer: Option<String>,
    pub session_id: Option<String>,
    pub session_engaged: Option<bool>,
    pub engagement_time_msec: Option<i64>,
    pub ga_session_id: Option<String>,
    pub ga_session_number: Option<i64>,

    // Click
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub link_classes: Option<String>,
    pub link_id: Option<String>,
    pub outbound: Option<bool>,

    // Scroll
    pub percent_scrolled: Option<f64>,

    // Commerce
    pub currency: Option<String>,
    pub value: Option<f64>,
    pub transaction_id: Option<String>,
    pub tax: Option<f64>,
    pub shipping: Option<f64>,
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub item_quantity: Option<i64>,
}

/// One session summary row per distinct (pseudo id, session id) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
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
    pub date: Option<NaiveDate>,
}

/// One user profile row per distinct pseudo id.
///
/// `first_seen` is `None` on update payloads: the sink merge must
/// leave the stored value untouched, so the aggregator never sends
/// one for a profile that already exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_pseudo_id: String,
    pub first_seen: Option<i64>,
    pub last_seen: i64,
    pub session_count: u64,
    pub event_count: u64,
    pub most_used_device: Option<String>,
    pub most_used_os: Option<String>,
    pub country: Option<String>,
    pub last_updated: i64,
}

/// Profile rows split by whether the pseudo id already exists in the
/// sink: new rows are appended, updated rows are merged by key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSplit {
    pub new: Vec<ProfileRecord>,
    pub updated: Vec<ProfileRecord>,
}

impl ProfileSplit {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty()
    }

    pub fn len(&self) -> usize {
        self.new.len() + self.updated.len()
    }
}
