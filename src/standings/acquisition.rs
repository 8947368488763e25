//! Fetch → extract → cache, as one refresh operation.
//!
//! Only one refresh runs at a time. A caller that arrives while a refresh is
//! in flight waits for it and receives the same result instead of issuing a
//! second upstream request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::cache::StandingsCache;
use super::error::AcquisitionError;
use super::models::StandingsSnapshot;
use crate::upstream::{extract_with, StandingsSource, TableLayout};

pub type RefreshResult = Result<Arc<StandingsSnapshot>, AcquisitionError>;

/// What caused a refresh; carried into the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Schedule,
    OnDemand,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trigger::Startup => "startup",
            Trigger::Schedule => "schedule",
            Trigger::OnDemand => "on-demand",
        };
        f.write_str(s)
    }
}

/// Bookkeeping about refresh attempts, surfaced on the status endpoint.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionStatus {
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub successes: u64,
    pub failures: u64,
}

#[derive(Default)]
struct RunSlot {
    last: Option<RefreshResult>,
}

pub struct Acquisition {
    source: Arc<dyn StandingsSource>,
    layout: TableLayout,
    cache: StandingsCache,
    /// Number of finished runs; lets a waiter tell whether it slept through one.
    completed: AtomicU64,
    slot: Mutex<RunSlot>,
    status: RwLock<AcquisitionStatus>,
}

impl Acquisition {
    pub fn new(source: Arc<dyn StandingsSource>, cache: StandingsCache) -> Self {
        Acquisition::with_layout(source, cache, TableLayout::default())
    }

    pub fn with_layout(
        source: Arc<dyn StandingsSource>,
        cache: StandingsCache,
        layout: TableLayout,
    ) -> Self {
        Acquisition {
            source,
            layout,
            cache,
            completed: AtomicU64::new(0),
            slot: Mutex::new(RunSlot::default()),
            status: RwLock::new(AcquisitionStatus::default()),
        }
    }

    pub fn cache(&self) -> &StandingsCache {
        &self.cache
    }

    pub async fn status(&self) -> AcquisitionStatus {
        self.status.read().await.clone()
    }

    /// Run a refresh, or join the one already in flight.
    pub async fn refresh(&self, trigger: Trigger) -> RefreshResult {
        let seen = self.completed.load(Ordering::Acquire);
        let mut slot = self.slot.lock().await;

        if self.completed.load(Ordering::Acquire) != seen {
            if let Some(last) = &slot.last {
                debug!(%trigger, "Joined in-flight standings refresh");
                return last.clone();
            }
        }

        let outcome = self.run_once(trigger).await;
        slot.last = Some(outcome.clone());
        self.completed.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn run_once(&self, trigger: Trigger) -> RefreshResult {
        info!(%trigger, source = self.source.name(), "Refreshing standings");
        self.status.write().await.last_attempt_at = Some(Utc::now());

        let html = match self.source.fetch_html().await {
            Ok(html) => html,
            Err(e) => {
                warn!(%trigger, error = %e, "Standings refresh failed: upstream unavailable");
                return self.fail(AcquisitionError::from(e)).await;
            }
        };

        let extraction = match extract_with(&html, &self.layout) {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!(
                    %trigger,
                    error = %e,
                    bytes = html.len(),
                    "Standings refresh failed: page did not parse"
                );
                return self.fail(AcquisitionError::from(e)).await;
            }
        };

        if extraction.unclassified_form_rows > 0 {
            warn!(
                rows = extraction.unclassified_form_rows,
                "Form icons present but unrecognised; form column may have changed upstream"
            );
        }
        if extraction.skipped_rows > 0 {
            debug!(skipped = extraction.skipped_rows, "Skipped non-team rows");
        }

        let snapshot = Arc::new(StandingsSnapshot::new(extraction.rows, Utc::now()));
        self.cache.set(snapshot.clone()).await;

        let mut status = self.status.write().await;
        status.last_success_at = Some(snapshot.fetched_at);
        status.last_error = None;
        status.successes += 1;
        drop(status);

        info!(%trigger, rows = snapshot.rows.len(), "Standings refreshed");
        Ok(snapshot)
    }

    async fn fail(&self, err: AcquisitionError) -> RefreshResult {
        let mut status = self.status.write().await;
        status.last_error = Some(err.to_string());
        status.failures += 1;
        Err(err)
    }
}
