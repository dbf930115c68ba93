//! Tick loop.
//!
//! Runs one pass immediately, then re-arms the tick interval AFTER each pass
//! finishes — passes never overlap, and a slow store stretches the cadence
//! instead of stacking work. A failed pass is logged and the loop carries
//! on; the calendar repairs itself on the next successful pass. There is no
//! cancellation: the loop ends when the process does.

use std::sync::Arc;

use tally_calendar::CalendarStore;
use tally_core::clock::Clock;
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::window::run_once;

/// Run reconciliation passes forever.
pub async fn run(store: Arc<dyn CalendarStore>, clock: Arc<dyn Clock>, config: EngineConfig) {
    loop {
        match run_once(store.as_ref(), clock.as_ref(), &config).await {
            Ok(summary) => {
                info!(periods = summary.periods.len(), "reconciliation pass complete");
            }
            Err(e) => {
                error!(error = %e, "reconciliation pass failed, retrying next tick");
            }
        }
        tokio::time::sleep(config.tick_interval).await;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;
    use tally_calendar::{
        CalendarEvent, EventDraft, InMemoryStore, StoreResult, TimeWindow,
    };
    use tally_core::{FixedClock, PAYMENT_TAG, PlacementPolicy};

    fn config(tick_secs: u64) -> EngineConfig {
        EngineConfig {
            placement_policy: PlacementPolicy::EndOfMonth,
            pay_date_day: 16,
            time_zone: chrono_tz::UTC,
            tick_interval: StdDuration::from_secs(tick_secs),
        }
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::at(
            chrono::Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap(),
        ))
    }

    /// Store wrapper counting payment queries (12 per pass).
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryStore,
        payment_queries: AtomicUsize,
    }

    impl CountingStore {
        fn passes(&self) -> usize {
            self.payment_queries.load(Ordering::SeqCst) / 12
        }
    }

    #[async_trait]
    impl CalendarStore for CountingStore {
        async fn query(
            &self,
            keyword: &str,
            window: Option<TimeWindow>,
        ) -> StoreResult<Vec<CalendarEvent>> {
            if keyword == PAYMENT_TAG {
                let _ = self.payment_queries.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.query(keyword, window).await
        }

        async fn delete(&self, event_id: &str) -> StoreResult<()> {
            self.inner.delete(event_id).await
        }

        async fn insert(&self, draft: EventDraft) -> StoreResult<CalendarEvent> {
            self.inner.insert(draft).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_pass_runs_immediately_then_per_tick() {
        let store = Arc::new(CountingStore::default());
        let handle = tokio::spawn(run(
            store.clone() as Arc<dyn CalendarStore>,
            clock(),
            config(3600),
        ));

        // Let the first pass complete; the tick has not elapsed yet.
        tokio::time::sleep(StdDuration::from_secs(1)).await;
        assert_eq!(store.passes(), 1);

        // One tick later a second pass has run.
        tokio::time::sleep(StdDuration::from_secs(3600)).await;
        assert_eq!(store.passes(), 2);

        handle.abort();
    }

    /// Store wrapper that stalls every payment query, recording pass starts.
    struct SlowStore {
        inner: InMemoryStore,
        delay: StdDuration,
        payment_queries: AtomicUsize,
        pass_starts: Mutex<Vec<tokio::time::Instant>>,
    }

    #[async_trait]
    impl CalendarStore for SlowStore {
        async fn query(
            &self,
            keyword: &str,
            window: Option<TimeWindow>,
        ) -> StoreResult<Vec<CalendarEvent>> {
            if keyword == PAYMENT_TAG {
                let n = self.payment_queries.fetch_add(1, Ordering::SeqCst);
                if n % 12 == 0 {
                    self.pass_starts.lock().unwrap().push(tokio::time::Instant::now());
                }
                tokio::time::sleep(self.delay).await;
            }
            self.inner.query(keyword, window).await
        }

        async fn delete(&self, event_id: &str) -> StoreResult<()> {
            self.inner.delete(event_id).await
        }

        async fn insert(&self, draft: EventDraft) -> StoreResult<CalendarEvent> {
            self.inner.insert(draft).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn interval_is_measured_from_completion() {
        // Each pass spends 12 × 100s inside the store; the tick is only 50s.
        // Interval-from-start scheduling would begin the next pass 50s in;
        // completion-measured scheduling spaces starts ≥ 1250s apart.
        let store = Arc::new(SlowStore {
            inner: InMemoryStore::new(),
            delay: StdDuration::from_secs(100),
            payment_queries: AtomicUsize::new(0),
            pass_starts: Mutex::new(Vec::new()),
        });
        let handle = tokio::spawn(run(
            store.clone() as Arc<dyn CalendarStore>,
            clock(),
            config(50),
        ));

        tokio::time::sleep(StdDuration::from_secs(3000)).await;
        handle.abort();

        let starts = store.pass_starts.lock().unwrap().clone();
        assert!(starts.len() >= 2, "expected at least two passes");
        let gap = starts[1] - starts[0];
        assert!(
            gap >= StdDuration::from_secs(1250),
            "pass started after {gap:?}, before the previous one finished + tick"
        );
    }
}
