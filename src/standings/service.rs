use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::acquisition::{Acquisition, AcquisitionStatus, Trigger};
use super::cache::StandingsCache;
use super::error::ServiceError;
use super::models::StandingsSnapshot;

/// Read path used by the HTTP layer.
///
/// Availability wins over freshness: if a forced refresh fails but an older
/// snapshot exists, the older snapshot is returned without an error.
#[derive(Clone)]
pub struct QueryService {
    acquisition: Arc<Acquisition>,
    cache: StandingsCache,
}

/// Health summary for operators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsStatus {
    pub has_data: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub row_count: usize,
    pub age_seconds: Option<i64>,
    #[serde(flatten)]
    pub acquisition: AcquisitionStatus,
}

impl QueryService {
    pub fn new(acquisition: Arc<Acquisition>) -> Self {
        let cache = acquisition.cache().clone();
        QueryService { acquisition, cache }
    }

    pub async fn get_standings(
        &self,
        force_refresh: bool,
    ) -> Result<Arc<StandingsSnapshot>, ServiceError> {
        if force_refresh || self.cache.get().await.is_none() {
            // Failures are already logged by the acquisition layer.
            if let Err(e) = self.acquisition.refresh(Trigger::OnDemand).await {
                debug!(error = %e, "On-demand refresh failed, falling back to cache");
            }
        }

        self.cache.get().await.ok_or(ServiceError::NoDataAvailable)
    }

    pub async fn status(&self) -> StandingsStatus {
        let snapshot = self.cache.get().await;
        let now = Utc::now();
        StandingsStatus {
            has_data: snapshot.is_some(),
            fetched_at: snapshot.as_ref().map(|s| s.fetched_at),
            row_count: snapshot.as_ref().map_or(0, |s| s.rows.len()),
            age_seconds: snapshot.as_ref().map(|s| s.age_secs(now)),
            acquisition: self.acquisition.status().await,
        }
    }
}
