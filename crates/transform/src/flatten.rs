//! Event flattening: raw events to uniform rows.

use etl_core::{
    dates::parse_compact_date, lookup_bool, lookup_f64, lookup_i64, lookup_str,
    lookup_string_like, EventParam, EventRecord, RawEvent,
};
use tracing::debug;

/// Event names forming the commerce category.
pub const COMMERCE_EVENTS: &[&str] = &["view_item", "add_to_cart", "begin_checkout", "purchase"];

/// The page-view event name.
pub const PAGE_VIEW: &str = "page_view";

/// The click event name.
pub const CLICK: &str = "click";

/// The scroll event name.
pub const SCROLL: &str = "scroll";

/// Mutually exclusive event-name categories.
///
/// A row belongs to at most one category; event names outside all
/// categories (custom events) receive only the common and
/// cross-event-type columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    PageView,
    Click,
    Scroll,
    Commerce,
}

impl EventCategory {
    /// Classifies an event name, or `None` for uncategorized events.
    pub fn classify(event_name: &str) -> Option<Self> {
        match event_name {
            PAGE_VIEW => Some(Self::PageView),
            CLICK => Some(Self::Click),
            SCROLL => Some(Self::Scroll),
            name if COMMERCE_EVENTS.contains(&name) => Some(Self::Commerce),
            _ => None,
        }
    }
}

/// Flattens a batch of raw events into uniform rows.
///
/// Pure and total: exactly one output row per input event, input
/// order preserved, empty input yields empty output. No extraction
/// failure escapes this boundary; anything missing or malformed
/// becomes an absent column.
pub fn flatten(events: &[RawEvent]) -> Vec<EventRecord> {
    if events.is_empty() {
        debug!("flatten called with empty batch");
        return Vec::new();
    }

    events.iter().map(flatten_one).collect()
}

fn flatten_one(event: &RawEvent) -> EventRecord {
    let mut row = EventRecord {
        // A malformed event_date leaves the column absent; the sink
        // falls back to the processing date for partitioning.
        date: parse_compact_date(&event.event_date).ok(),
        timestamp: event.event_timestamp,
        event_name: event.event_name.clone(),
        user_id: event.user_id.clone(),
        user_pseudo_id: event.user_pseudo_id.clone(),
        platform: event.platform.clone(),
        ..Default::default()
    };

    // Nested attribute groups: absent group leaves every sub-column
    // absent rather than erroring.
    if let Some(ref device) = event.device {
        row.device_category = device.category.clone();
        row.device_mobile_brand_name = device.mobile_brand_name.clone();
        row.device_mobile_model_name = device.mobile_model_name.clone();
        row.device_operating_system = device.operating_system.clone();
        row.device_language = device.language.clone();
    }
    if let Some(ref geo) = event.geo {
        row.geo_country = geo.country.clone();
        row.geo_region = geo.region.clone();
        row.geo_city = geo.city.clone();
    }
    if let Some(ref traffic) = event.traffic_source {
        row.traffic_source_name = traffic.name.clone();
        row.traffic_source_medium = traffic.medium.clone();
        row.traffic_source_source = traffic.source.clone();
    }

    apply_common_params(&mut row, &event.event_params);

    // Category columns after common ones; each arm only populates
    // cells that are still absent, never blanks a set one.
    match EventCategory::classify(&event.event_name) {
        Some(EventCategory::PageView) => apply_page_view_params(&mut row, &event.event_params),
        Some(EventCategory::Click) => apply_click_params(&mut row, &event.event_params),
        Some(EventCategory::Scroll) => apply_scroll_params(&mut row, &event.event_params),
        Some(EventCategory::Commerce) => apply_commerce_params(&mut row, event),
        None => {}
    }

    row
}

/// Cross-event-type parameters, extracted for every row.
fn apply_common_params(row: &mut EventRecord, params: &[EventParam]) {
    row.page_location = lookup_str(params, "page_location");
    row.page_title = lookup_str(params, "page_title");
    row.page_referrer = lookup_str(params, "page_referrer");
    row.session_id = lookup_string_like(params, "session_id");
    row.session_engaged = lookup_bool(params, "session_engaged");
    row.engagement_time_msec = lookup_i64(params, "engagement_time_msec");
    row.ga_session_id = lookup_string_like(params, "ga_session_id");
    row.ga_session_number = lookup_i64(params, "ga_session_number");
}

fn apply_page_view_params(row: &mut EventRecord, params: &[EventParam]) {
    // The page columns double as cross-type columns; keep whatever
    // the common pass already extracted.
    if row.page_location.is_none() {
        row.page_location = lookup_str(params, "page_location");
    }
    if row.page_title.is_none() {
        row.page_title = lookup_str(params, "page_title");
    }
    if row.page_referrer.is_none() {
        row.page_referrer = lookup_str(params, "page_referrer");
    }
}

fn apply_click_params(row: &mut EventRecord, params: &[EventParam]) {
    row.link_url = lookup_str(params, "link_url");
    row.link_text = lookup_str(params, "link_text");
    row.link_classes = lookup_str(params, "link_classes");
    row.link_id = lookup_str(params, "link_id");
    row.outbound = lookup_bool(params, "outbound");
}

fn apply_scroll_params(row: &mut EventRecord, params: &[EventParam]) {
    row.percent_scrolled = lookup_f64(params, "percent_scrolled");
}

fn apply_commerce_params(row: &mut EventRecord, event: &RawEvent) {
    let params = &event.event_params;
    row.currency = lookup_str(params, "currency");
    row.value = lookup_f64(params, "value");
    row.transaction_id = lookup_str(params, "transaction_id");
    row.tax = lookup_f64(params, "tax");
    row.shipping = lookup_f64(params, "shipping");

    // Only the first line item survives flattening; a full item
    // explosion would multiply rows and break the one-row-per-event
    // contract.
    if let Some(item) = event.items.first() {
        row.item_id = item.item_id.clone();
        row.item_name = item.item_name.clone();
        row.item_quantity = item.quantity;
    }
}
