//! Raw event builders for pipeline tests.

use etl_core::raw::{DeviceInfo, GeoInfo, Item, TrafficSourceInfo};
use etl_core::{EventParam, ParamValue, RawEvent};

/// String-slot parameter.
pub fn str_param(key: &str, value: &str) -> EventParam {
    EventParam::new(
        key,
        ParamValue {
            string_value: Some(value.to_string()),
            ..Default::default()
        },
    )
}

/// Int-slot parameter.
pub fn int_param(key: &str, value: i64) -> EventParam {
    EventParam::new(
        key,
        ParamValue {
            int_value: Some(value),
            ..Default::default()
        },
    )
}

/// Double-slot parameter.
pub fn double_param(key: &str, value: f64) -> EventParam {
    EventParam::new(
        key,
        ParamValue {
            double_value: Some(value),
            ..Default::default()
        },
    )
}

/// Base raw event on 2024-01-15 with a session key.
pub fn raw_event(pseudo_id: &str, event_name: &str, timestamp: i64, session: i64) -> RawEvent {
    RawEvent {
        event_date: "20240115".to_string(),
        event_timestamp: timestamp,
        event_name: event_name.to_string(),
        user_id: None,
        user_pseudo_id: pseudo_id.to_string(),
        platform: Some("WEB".to_string()),
        event_params: vec![int_param("ga_session_id", session)],
        user_properties: vec![],
        device: Some(DeviceInfo {
            category: Some("desktop".to_string()),
            operating_system: Some("macOS".to_string()),
            ..Default::default()
        }),
        geo: Some(GeoInfo {
            country: Some("JP".to_string()),
            city: Some("Tokyo".to_string()),
            ..Default::default()
        }),
        traffic_source: Some(TrafficSourceInfo {
            name: Some("organic".to_string()),
            medium: Some("search".to_string()),
            source: Some("google".to_string()),
        }),
        items: vec![],
    }
}

/// Page view with location, title, and engagement time.
pub fn page_view(pseudo_id: &str, timestamp: i64, session: i64, location: &str) -> RawEvent {
    let mut event = raw_event(pseudo_id, "page_view", timestamp, session);
    event.event_params.extend([
        str_param("page_location", location),
        str_param("page_title", "Home"),
        str_param("page_referrer", "https://google.com/"),
        int_param("engagement_time_msec", 1500),
        int_param("session_engaged", 1),
    ]);
    event
}

/// Click with link parameters.
pub fn click(pseudo_id: &str, timestamp: i64, session: i64, link_url: &str) -> RawEvent {
    let mut event = raw_event(pseudo_id, "click", timestamp, session);
    event.event_params.extend([
        str_param("link_url", link_url),
        str_param("link_text", "Read more"),
        int_param("outbound", 1),
        int_param("engagement_time_msec", 500),
    ]);
    event
}

/// Scroll with depth.
pub fn scroll(pseudo_id: &str, timestamp: i64, session: i64, depth: f64) -> RawEvent {
    let mut event = raw_event(pseudo_id, "scroll", timestamp, session);
    event
        .event_params
        .push(double_param("percent_scrolled", depth));
    event
}

/// Purchase with two line items; only the first should surface.
pub fn purchase(pseudo_id: &str, timestamp: i64, session: i64) -> RawEvent {
    let mut event = raw_event(pseudo_id, "purchase", timestamp, session);
    event.event_params.extend([
        str_param("currency", "JPY"),
        double_param("value", 4200.0),
        str_param("transaction_id", "T-0001"),
        double_param("tax", 420.0),
        double_param("shipping", 500.0),
    ]);
    event.items = vec![
        Item {
            item_id: Some("SKU-1".to_string()),
            item_name: Some("First".to_string()),
            quantity: Some(2),
        },
        Item {
            item_id: Some("SKU-2".to_string()),
            item_name: Some("Second".to_string()),
            quantity: Some(1),
        },
    ];
    event
}

/// Event with no session key parameter at all.
pub fn keyless_event(pseudo_id: &str, event_name: &str, timestamp: i64) -> RawEvent {
    let mut event = raw_event(pseudo_id, event_name, timestamp, 0);
    event.event_params.clear();
    event
}
