//! Daily and backfill run orchestration.

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::stats::{DateStats, RunSummary};
use crate::traits::{EventSink, EventSource};
use etl_core::dates::{date_range, target_date};
use etl_core::{Error, Result};
use notify::Notifier;

/// Orchestrates one pipeline run over a source and a sink.
pub struct Pipeline<S, K> {
    source: S,
    sink: K,
    notifier: Notifier,
}

impl<S: EventSource, K: EventSink> Pipeline<S, K> {
    pub fn new(source: S, sink: K, notifier: Notifier) -> Self {
        Self {
            source,
            sink,
            notifier,
        }
    }

    /// Processes one calendar date end to end.
    ///
    /// An empty extract is a no-op: nothing is written, so previously
    /// stored partitions for the date survive. A batch without any
    /// session key still produces events and profiles; only the
    /// sessions table is skipped for that date.
    pub async fn run_date(&self, date: NaiveDate) -> Result<DateStats> {
        let raw = self.source.fetch_raw_events(date).await?;
        if raw.is_empty() {
            info!(date = %date, "No raw events for date, nothing to write");
            return Ok(DateStats::default());
        }

        let mut events = transform::flatten(&raw);
        // Stable sort keeps arrival order within equal timestamps, so
        // session boundaries and first-event attributes are
        // reproducible regardless of extract ordering.
        events.sort_by_key(|e| e.timestamp);

        let sessions = match transform::sessionize(&events) {
            Ok(sessions) => sessions,
            Err(Error::MissingSessionKey) => {
                warn!(date = %date, "No session keys in batch, skipping sessions table");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut seen = std::collections::HashSet::new();
        let ids: Vec<String> = events
            .iter()
            .filter(|e| seen.insert(e.user_pseudo_id.as_str()))
            .map(|e| e.user_pseudo_id.clone())
            .collect();
        let existing = self.sink.existing_profile_ids(&ids).await?;
        let profiles = transform::aggregate(&events, &existing);

        let events_written = self.sink.replace_events_partition(date, &events).await?;
        let sessions_written = self
            .sink
            .replace_sessions_partition(date, &sessions)
            .await?;
        self.sink.upsert_profiles(&profiles).await?;

        let stats = DateStats {
            raw_events: raw.len() as u64,
            events: events_written as u64,
            sessions: sessions_written as u64,
            profiles_new: profiles.new.len() as u64,
            profiles_updated: profiles.updated.len() as u64,
        };

        info!(
            date = %date,
            raw_events = stats.raw_events,
            events = stats.events,
            sessions = stats.sessions,
            profiles_new = stats.profiles_new,
            profiles_updated = stats.profiles_updated,
            "Processed date"
        );

        Ok(stats)
    }

    /// Runs the daily mode for the date `days_back` days before today.
    pub async fn run_daily(&self, days_back: u64) -> Result<RunSummary> {
        let date = target_date(days_back);
        let description = format!("Mode: daily, target date: {}", date);
        self.notifier.notify_start(&description).await;

        match self.run_date(date).await {
            Ok(stats) => {
                let mut summary = RunSummary::default();
                summary.absorb(&stats);
                self.notifier
                    .notify_success(&description, &summary.to_map())
                    .await;
                Ok(summary)
            }
            Err(e) => {
                error!(date = %date, error = %e, "Daily run failed");
                self.notifier
                    .notify_failure(&description, &e.to_string())
                    .await;
                Err(e)
            }
        }
    }

    /// Runs the backfill mode over an inclusive date range.
    ///
    /// A failing date is logged and counted, the remaining dates still
    /// run. The summary reports how many dates failed; the caller
    /// decides the process exit status from it.
    pub async fn run_backfill(&self, start: NaiveDate, end: NaiveDate) -> Result<RunSummary> {
        let dates = date_range(start, end);
        if dates.is_empty() {
            return Err(Error::config(format!(
                "Empty backfill range: {} to {}",
                start, end
            )));
        }

        let description = format!("Mode: full, range: {} to {}", start, end);
        self.notifier.notify_start(&description).await;

        let mut summary = RunSummary::default();
        for date in dates {
            match self.run_date(date).await {
                Ok(stats) => summary.absorb(&stats),
                Err(e) => {
                    error!(date = %date, error = %e, "Backfill date failed, continuing");
                    summary.dates_failed += 1;
                }
            }
        }

        if summary.dates_failed > 0 {
            self.notifier
                .notify_failure(
                    &description,
                    &format!("{} of {} dates failed", summary.dates_failed, summary.dates_failed + summary.dates_processed),
                )
                .await;
        } else {
            self.notifier
                .notify_success(&description, &summary.to_map())
                .await;
        }

        Ok(summary)
    }
}
