//! Connection health check.

use tracing::debug;

use crate::client::WarehouseClient;
use etl_core::Result;

/// Verifies the ClickHouse connection with a trivial query.
pub async fn check_connection(client: &WarehouseClient) -> Result<()> {
    let one: u8 = client
        .inner()
        .query("SELECT 1")
        .fetch_one()
        .await
        .map_err(|e| etl_core::Error::query(format!("Health check failed: {}", e)))?;
    debug!(result = one, "Health check passed");
    Ok(())
}
