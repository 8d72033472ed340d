//! Raw event model matching the GA4 export shape.

use serde::{Deserialize, Serialize};

use crate::params::EventParam;

/// Device attribute group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub category: Option<String>,
    pub mobile_brand_name: Option<String>,
    pub mobile_model_name: Option<String>,
    pub operating_system: Option<String>,
    pub language: Option<String>,
}

/// Geo attribute group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
}

/// Traffic source attribute group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficSourceInfo {
    pub name: Option<String>,
    pub medium: Option<String>,
    pub source: Option<String>,
}

/// One commerce line item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub quantity: Option<i64>,
}

/// One raw analytics event as extracted from the warehouse.
///
/// Immutable for the duration of a pipeline run. `event_date` is the
/// compact `YYYYMMDD` form used by the export's partition suffix;
/// `event_timestamp` is microseconds since epoch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    pub event_date: String,
    pub event_timestamp: i64,
    pub event_name: String,
    pub user_id: Option<String>,
    pub user_pseudo_id: String,
    pub platform: Option<String>,
    #[serde(default)]
    pub event_params: Vec<EventParam>,
    #[serde(default)]
    pub user_properties: Vec<EventParam>,
    pub device: Option<DeviceInfo>,
    pub geo: Option<GeoInfo>,
    pub traffic_source: Option<TrafficSourceInfo>,
    #[serde(default)]
    pub items: Vec<Item>,
}
