//! Warehouse configuration.

use serde::{Deserialize, Serialize};

/// ClickHouse connection and table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// ClickHouse HTTP URL
    pub url: String,
    /// Database holding the derived tables
    #[serde(default = "default_database")]
    pub database: String,
    /// Database holding the raw GA4 export
    #[serde(default = "default_source_database")]
    pub source_database: String,
    /// Raw events table name
    #[serde(default = "default_raw_events_table")]
    pub raw_events_table: String,
    /// Username (optional)
    pub username: Option<String>,
    /// Password (optional)
    pub password: Option<String>,
    /// Query timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_database() -> String {
    "ga4_processed".to_string()
}

fn default_source_database() -> String {
    "ga4_raw".to_string()
}

fn default_raw_events_table() -> String {
    "events".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".to_string(),
            database: default_database(),
            source_database: default_source_database(),
            raw_events_table: default_raw_events_table(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
