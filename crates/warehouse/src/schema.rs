//! ClickHouse table schemas for the derived tables.
//!
//! Events and sessions are partitioned by date so a daily run can
//! replace one partition atomically. Profiles are keyed by pseudo id
//! and mutated in place.

use tracing::info;

use crate::client::WarehouseClient;
use etl_core::Result;

/// SQL for creating the database.
pub fn create_database(db: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {db}")
}

/// SQL for creating the flattened events table.
pub fn create_events_table(db: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {db}.events (
    -- Common columns
    date Date,
    timestamp DateTime64(6),
    event_name LowCardinality(String),
    user_id Nullable(String),
    user_pseudo_id String,
    platform LowCardinality(Nullable(String)),

    -- Device
    device_category LowCardinality(Nullable(String)),
    device_mobile_brand_name Nullable(String),
    device_mobile_model_name Nullable(String),
    device_operating_system LowCardinality(Nullable(String)),
    device_language LowCardinality(Nullable(String)),

    -- Geo
    geo_country LowCardinality(Nullable(String)),
    geo_region Nullable(String),
    geo_city Nullable(String),

    -- Traffic source
    traffic_source_name Nullable(String),
    traffic_source_medium LowCardinality(Nullable(String)),
    traffic_source_source Nullable(String),

    -- Cross-event-type parameters
    page_location Nullable(String),
    page_title Nullable(String),
    page_referrer Nullable(String),
    session_id Nullable(String),
    session_engaged Nullable(UInt8),
    engagement_time_msec Nullable(Int64),
    ga_session_id Nullable(String),
    ga_session_number Nullable(Int64),

    -- Click
    link_url Nullable(String),
    link_text Nullable(String),
    link_classes Nullable(String),
    link_id Nullable(String),
    outbound Nullable(UInt8),

    -- Scroll
    percent_scrolled Nullable(Float64),

    -- Commerce
    currency LowCardinality(Nullable(String)),
    value Nullable(Float64),
    transaction_id Nullable(String),
    tax Nullable(Float64),
    shipping Nullable(Float64),
    item_id Nullable(String),
    item_name Nullable(String),
    item_quantity Nullable(Int64)
)
ENGINE = MergeTree()
PARTITION BY date
ORDER BY (user_pseudo_id, timestamp)
SETTINGS index_granularity = 8192
"#
    )
}

/// SQL for creating the sessions table.
pub fn create_sessions_table(db: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {db}.sessions (
    user_pseudo_id String,
    ga_session_id String,
    session_start_time DateTime64(6),
    session_end_time DateTime64(6),
    session_duration_seconds Float64,
    pageviews UInt64,
    engagement_time_msec Int64,

    -- First-event attributes
    referrer Nullable(String),
    device_category LowCardinality(Nullable(String)),
    operating_system LowCardinality(Nullable(String)),
    country LowCardinality(Nullable(String)),
    city Nullable(String),
    traffic_source Nullable(String),
    traffic_medium LowCardinality(Nullable(String)),

    date Date
)
ENGINE = MergeTree()
PARTITION BY date
ORDER BY (user_pseudo_id, ga_session_id)
SETTINGS index_granularity = 8192
"#
    )
}

/// SQL for creating the user_profiles table.
pub fn create_user_profiles_table(db: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {db}.user_profiles (
    user_pseudo_id String,
    first_seen DateTime64(6),
    last_seen DateTime64(6),
    session_count UInt64,
    event_count UInt64,
    most_used_device LowCardinality(Nullable(String)),
    most_used_os LowCardinality(Nullable(String)),
    country LowCardinality(Nullable(String)),
    last_updated DateTime64(6)
)
ENGINE = MergeTree()
ORDER BY user_pseudo_id
SETTINGS index_granularity = 8192
"#
    )
}

/// All schema statements for the derived database.
pub fn all_tables(db: &str) -> Vec<String> {
    vec![
        create_database(db),
        create_events_table(db),
        create_sessions_table(db),
        create_user_profiles_table(db),
    ]
}

/// Initialize the database schema.
///
/// Creates the database and all derived tables if they don't exist.
pub async fn init_schema(client: &WarehouseClient) -> Result<()> {
    let db = client.config().database.clone();
    for sql in all_tables(&db) {
        client
            .inner()
            .query(&sql)
            .execute()
            .await
            .map_err(|e| etl_core::Error::load(format!("Schema init error: {}", e)))?;
    }
    info!(database = %db, "Schema initialized");
    Ok(())
}
