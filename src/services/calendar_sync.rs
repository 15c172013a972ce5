//! Periodic mirroring of the external calendar into `calendar_events`.

use anyhow::Result;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use crate::database::{connection::DatabaseManager, models::*};
use crate::services::calendar::{CalendarSource, RemoteEvent};
use crate::utils::auditory_names::to_canonical;
use crate::utils::datetime::now_naive;
use crate::utils::logging::{log_database_error, log_system_event};
use crate::utils::translit::to_latin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub saved: usize,
    pub failed: usize,
}

/// One calendar feed bound to the store, with an Idle/Syncing guard.
pub struct CalendarSync {
    db: Arc<DatabaseManager>,
    source: Arc<dyn CalendarSource>,
    window_days: i64,
    syncing: AtomicBool,
}

/// Puts the state back to Idle however the pass ends.
struct SyncingGuard<'a>(&'a AtomicBool);

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CalendarSync {
    pub fn new(db: Arc<DatabaseManager>, source: Arc<dyn CalendarSource>, window_days: i64) -> Self {
        Self {
            db,
            source,
            window_days,
            syncing: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SyncState {
        if self.syncing.load(Ordering::Acquire) {
            SyncState::Syncing
        } else {
            SyncState::Idle
        }
    }

    /// Runs one pass. Returns `None` when a pass is already in progress;
    /// that tick is dropped, not queued.
    pub async fn run_pass(&self) -> Option<SyncReport> {
        if self
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Calendar sync still running, skipping this tick");
            return None;
        }
        let _guard = SyncingGuard(&self.syncing);

        log_system_event("Calendar sync started", None);
        match sync_events(&self.db, self.source.as_ref(), self.window_days).await {
            Ok(report) => {
                log_system_event(
                    "Calendar sync finished",
                    Some(&format!(
                        "fetched {}, saved {}, failed {}",
                        report.fetched, report.saved, report.failed
                    )),
                );
                Some(report)
            }
            Err(e) => {
                tracing::error!("Calendar sync failed: {:#}", e);
                Some(SyncReport::default())
            }
        }
    }
}

/// Fetches `[now, now + window_days)` and upserts every event.
///
/// A fetch error aborts the pass before any write. A failing event is
/// logged and counted; the rest of the batch still goes through.
pub async fn sync_events(
    db: &DatabaseManager,
    source: &dyn CalendarSource,
    window_days: i64,
) -> Result<SyncReport> {
    let now = Utc::now();
    let events = source
        .fetch_events(now, now + Duration::days(window_days))
        .await?;

    let auditories: HashMap<String, i64> = Auditory::list_active(&db.pool)
        .await?
        .into_iter()
        .map(|a| (a.name, a.id))
        .collect();

    let mut report = SyncReport {
        fetched: events.len(),
        ..SyncReport::default()
    };
    let synced_at = now_naive();

    for event in &events {
        let upsert = to_upsert(event, &auditories);
        match CalendarEvent::upsert(&db.pool, &upsert, synced_at).await {
            Ok(()) => {
                report.saved += 1;
                tracing::debug!(
                    "Event {} saved (auditory: {:?})",
                    event.id, upsert.auditory_id
                );
            }
            Err(e) => {
                report.failed += 1;
                log_database_error("UPSERT", "calendar_events", &e.to_string(), Some(&event.id));
            }
        }
    }

    Ok(report)
}

fn to_upsert(event: &RemoteEvent, auditories: &HashMap<String, i64>) -> EventUpsert {
    EventUpsert {
        google_event_id: event.id.clone(),
        auditory_id: resolve_auditory(event, auditories),
        title: event.title.clone(),
        description: event.description.clone().unwrap_or_default(),
        start_time: event.start.to_local_naive(),
        end_time: event.end.to_local_naive(),
        organizer: event.organizer.clone().unwrap_or_default(),
        status: event.status.clone(),
    }
}

/// Matches the event's location (or, lacking one, its description) against
/// canonical auditory names: first as a display label, then transliterated.
pub fn resolve_auditory(event: &RemoteEvent, auditories: &HashMap<String, i64>) -> Option<i64> {
    let candidate = [event.location.as_deref(), event.description.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|text| !text.is_empty())?;

    auditories
        .get(to_canonical(candidate))
        .or_else(|| auditories.get(&to_latin(candidate)))
        .copied()
}

/// Schedules [`CalendarSync::run_pass`] at a fixed interval.
pub struct CalendarSyncService {
    sync: Arc<CalendarSync>,
    scheduler: JobScheduler,
    interval: std::time::Duration,
}

impl CalendarSyncService {
    pub async fn new(
        sync: Arc<CalendarSync>,
        interval: std::time::Duration,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            sync,
            scheduler,
            interval,
        })
    }

    /// Runs one pass in the background right away, then every `interval`.
    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let sync = self.sync.clone();
        let sync_job = Job::new_repeated_async(self.interval, move |_uuid, _l| {
            let sync = sync.clone();
            Box::pin(async move {
                sync.run_pass().await;
            })
        })?;

        self.scheduler.add(sync_job).await?;
        self.scheduler.start().await?;

        let sync = self.sync.clone();
        tokio::spawn(async move {
            sync.run_pass().await;
        });

        tracing::info!(
            "Calendar sync service started - every {} minutes",
            self.interval.as_secs() / 60
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}
