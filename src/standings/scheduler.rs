use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::acquisition::{Acquisition, Trigger};

/// Spawns a background task that refreshes the standings once immediately
/// and then every `every`. A failed run only leaves the cache untouched;
/// the next tick tries again.
pub fn start_refresh_scheduler(acquisition: Arc<Acquisition>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval = ?every, "Standings scheduler started");

        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut trigger = Trigger::Startup;

        loop {
            interval.tick().await;
            // Outcome is logged inside refresh.
            if let Ok(snapshot) = acquisition.refresh(trigger).await {
                debug!(%trigger, rows = snapshot.rows.len(), "Scheduled refresh done");
            }
            trigger = Trigger::Schedule;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::cache::StandingsCache;
    use crate::standings::error::FetchError;
    use crate::upstream::testing::{table_html, ScriptedSource};

    const SIX_HOURS: Duration = Duration::from_secs(6 * 60 * 60);

    #[tokio::test(start_paused = true)]
    async fn test_runs_at_startup_then_on_interval() {
        let source = Arc::new(ScriptedSource::always(Ok(table_html(&[("Alpha SC", 9)]))));
        let acq = Arc::new(Acquisition::new(source.clone(), StandingsCache::new()));

        let handle = start_refresh_scheduler(acq.clone(), SIX_HOURS);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);
        assert!(acq.cache().get().await.is_some());

        tokio::time::sleep(SIX_HOURS).await;
        assert_eq!(source.calls(), 2);

        tokio::time::sleep(SIX_HOURS).await;
        assert_eq!(source.calls(), 3);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_does_not_stop_schedule() {
        let source = Arc::new(ScriptedSource::new(vec![
            Err(FetchError::Timeout(10)),
            Ok(table_html(&[("Alpha SC", 9)])),
        ]));
        let acq = Arc::new(Acquisition::new(source.clone(), StandingsCache::new()));

        let handle = start_refresh_scheduler(acq.clone(), SIX_HOURS);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(acq.cache().get().await.is_none());
        assert!(!handle.is_finished());

        tokio::time::sleep(SIX_HOURS).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(acq.cache().get().await.unwrap().rows.len(), 1);

        handle.abort();
    }
}
