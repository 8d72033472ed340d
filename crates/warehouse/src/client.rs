//! ClickHouse client wrapper.

use clickhouse::Client;
use etl_core::Result;
use tracing::info;

use crate::config::WarehouseConfig;

/// ClickHouse client wrapper shared by source and sink operations.
#[derive(Clone)]
pub struct WarehouseClient {
    inner: Client,
    config: WarehouseConfig,
}

impl WarehouseClient {
    /// Creates a new warehouse client.
    pub fn new(config: WarehouseConfig) -> Result<Self> {
        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);

        if let Some(ref user) = config.username {
            client = client.with_user(user);
        }

        if let Some(ref pass) = config.password {
            client = client.with_password(pass);
        }

        info!(
            url = %config.url,
            database = %config.database,
            source_database = %config.source_database,
            "Created warehouse client"
        );

        Ok(Self {
            inner: client,
            config,
        })
    }

    /// Returns the inner clickhouse client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    /// Fully qualified name of a derived table.
    pub fn table(&self, name: &str) -> String {
        format!("{}.{}", self.config.database, name)
    }

    /// Fully qualified name of the raw events table.
    pub fn raw_events_table(&self) -> String {
        format!(
            "{}.{}",
            self.config.source_database, self.config.raw_events_table
        )
    }
}
