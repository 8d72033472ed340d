//! Partitioned writes and profile merges.
//!
//! Events and sessions land with replace-partition semantics: the
//! target date's partition is dropped, then the new rows are appended.
//! Re-running a date therefore converges to the same stored state.
//! Profiles are append-for-new plus mutate-for-existing, so
//! `first_seen` is written exactly once per pseudo id.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::client::WarehouseClient;
use crate::rows::{EventRow, ProfileRow, SessionRow};
use etl_core::{Error, EventRecord, ProfileSplit, Result, SessionRecord};

async fn drop_partition(client: &WarehouseClient, table: &str, date: NaiveDate) -> Result<()> {
    let sql = format!("ALTER TABLE {} DROP PARTITION ?", client.table(table));
    client
        .inner()
        .query(&sql)
        .bind(date.format("%Y-%m-%d").to_string())
        .execute()
        .await
        .map_err(|e| Error::load(format!("Partition drop failed for {}: {}", table, e)))?;
    Ok(())
}

/// Replaces the events partition for `date` with `records`.
///
/// An empty batch skips the write entirely, leaving any previously
/// stored partition untouched.
pub async fn replace_events_partition(
    client: &WarehouseClient,
    date: NaiveDate,
    records: &[EventRecord],
) -> Result<usize> {
    if records.is_empty() {
        warn!(date = %date, "No event rows to write, skipping partition replace");
        return Ok(0);
    }

    drop_partition(client, "events", date).await?;

    let mut insert = client
        .inner()
        .insert(&client.table("events"))
        .map_err(|e| Error::load(format!("Insert error: {}", e)))?;

    for record in records {
        let row = EventRow::from_record(record, date);
        insert
            .write(&row)
            .await
            .map_err(|e| Error::load(format!("Write error: {}", e)))?;
    }

    insert
        .end()
        .await
        .map_err(|e| Error::load(format!("End error: {}", e)))?;

    info!(date = %date, count = records.len(), "Replaced events partition");
    Ok(records.len())
}

/// Replaces the sessions partition for `date` with `records`.
pub async fn replace_sessions_partition(
    client: &WarehouseClient,
    date: NaiveDate,
    records: &[SessionRecord],
) -> Result<usize> {
    if records.is_empty() {
        warn!(date = %date, "No session rows to write, skipping partition replace");
        return Ok(0);
    }

    drop_partition(client, "sessions", date).await?;

    let mut insert = client
        .inner()
        .insert(&client.table("sessions"))
        .map_err(|e| Error::load(format!("Insert error: {}", e)))?;

    for record in records {
        let row = SessionRow::from_record(record, date);
        insert
            .write(&row)
            .await
            .map_err(|e| Error::load(format!("Write error: {}", e)))?;
    }

    insert
        .end()
        .await
        .map_err(|e| Error::load(format!("End error: {}", e)))?;

    info!(date = %date, count = records.len(), "Replaced sessions partition");
    Ok(records.len())
}

/// Returns the subset of `ids` already present in the profiles table.
pub async fn existing_profile_ids(
    client: &WarehouseClient,
    ids: &[String],
) -> Result<HashSet<String>> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let sql = format!(
        "SELECT user_pseudo_id FROM {} WHERE user_pseudo_id IN ?",
        client.table("user_profiles")
    );
    let found: Vec<String> = client
        .inner()
        .query(&sql)
        .bind(ids)
        .fetch_all()
        .await
        .map_err(|e| Error::query(format!("Profile lookup failed: {}", e)))?;

    debug!(requested = ids.len(), found = found.len(), "Looked up existing profiles");
    Ok(found.into_iter().collect())
}

/// Writes a profile split: new profiles are appended, existing ones
/// are merged by key through mutations that never touch `first_seen`.
///
/// ClickHouse mutations apply asynchronously, which is acceptable for
/// a daily batch cadence.
pub async fn upsert_profiles(client: &WarehouseClient, split: &ProfileSplit) -> Result<usize> {
    if split.is_empty() {
        warn!("No profile rows to write, skipping upsert");
        return Ok(0);
    }

    if !split.new.is_empty() {
        let mut insert = client
            .inner()
            .insert(&client.table("user_profiles"))
            .map_err(|e| Error::load(format!("Insert error: {}", e)))?;

        for record in &split.new {
            let row = ProfileRow::from_record(record);
            insert
                .write(&row)
                .await
                .map_err(|e| Error::load(format!("Write error: {}", e)))?;
        }

        insert
            .end()
            .await
            .map_err(|e| Error::load(format!("End error: {}", e)))?;
    }

    let update_sql = format!(
        "ALTER TABLE {} UPDATE \
         last_seen = ?, session_count = ?, event_count = ?, \
         most_used_device = ?, most_used_os = ?, country = ?, last_updated = ? \
         WHERE user_pseudo_id = ?",
        client.table("user_profiles")
    );

    for record in &split.updated {
        client
            .inner()
            .query(&update_sql)
            .bind(record.last_seen)
            .bind(record.session_count)
            .bind(record.event_count)
            .bind(record.most_used_device.as_deref())
            .bind(record.most_used_os.as_deref())
            .bind(record.country.as_deref())
            .bind(record.last_updated)
            .bind(record.user_pseudo_id.as_str())
            .execute()
            .await
            .map_err(|e| Error::load(format!("Profile update failed: {}", e)))?;
    }

    info!(
        new = split.new.len(),
        updated = split.updated.len(),
        "Upserted profiles"
    );
    Ok(split.len())
}
