use agenda_shared::{PublishOutcome, StatusPagePublisher};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

/// Source of the invocation time, in local wall-clock terms
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub struct PublishScheduler {
    publisher: Arc<StatusPagePublisher>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl PublishScheduler {
    pub fn new(
        publisher: Arc<StatusPagePublisher>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            publisher,
            clock,
            interval,
        }
    }

    /// A single invocation; failures are logged by the publisher
    pub async fn run_once(&self) -> Option<PublishOutcome> {
        let now = self.clock.now();
        tracing::debug!("Running publish cycle at {}", now);
        self.publisher.run(now).await
    }

    /// Publish on every tick, starting immediately. Never returns.
    pub async fn run(&self) {
        let mut ticker = time::interval(self.interval);
        // A slow cycle should not trigger a burst of catch-up runs
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        tracing::info!("Publish scheduler started (interval: {:?})", self.interval);

        loop {
            ticker.tick().await;
            if self.run_once().await.is_none() {
                tracing::warn!("Publish cycle failed, keeping previously published page");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_shared::memory::{InMemoryDocuments, InMemoryStore};
    use agenda_shared::{SourceRepo, OUTPUT_KEY, TEMPLATE_KEY};
    use chrono::NaiveDate;

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn fixed(y: i32, m: u32, d: u32) -> Arc<dyn Clock> {
        let now = NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid datetime");
        Arc::new(FixedClock(now))
    }

    fn scheduler(store: Arc<InMemoryStore>, clock: Arc<dyn Clock>) -> PublishScheduler {
        let docs = InMemoryDocuments::new().with_file(
            "2024/06.md",
            "- **Dates**: 12 - 15 June 2024\n- **Location**: Remote\n",
        );
        let publisher = StatusPagePublisher::new(Arc::new(docs), store, SourceRepo::default());
        PublishScheduler::new(Arc::new(publisher), clock, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_run_once_uses_clock() {
        let store = Arc::new(
            InMemoryStore::new().with_object(TEMPLATE_KEY, "{meeting-days-left}"),
        );

        let outcome = scheduler(store.clone(), fixed(2024, 6, 1)).run_once().await;
        assert!(outcome.is_some());
        // Noon on June 1st is 10.5 days before the meeting
        assert_eq!(
            store.get(OUTPUT_KEY).map(|o| o.content).as_deref(),
            Some("10")
        );
    }

    #[tokio::test]
    async fn test_run_once_reports_failure() {
        let store = Arc::new(InMemoryStore::new());
        assert!(scheduler(store, fixed(2024, 6, 1)).run_once().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_publishes_on_first_tick() {
        let store = Arc::new(InMemoryStore::new().with_object(TEMPLATE_KEY, "{meeting-time}"));
        let scheduler = scheduler(store.clone(), fixed(2024, 5, 1));

        let handle = tokio::spawn(async move { scheduler.run().await });
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.abort();

        assert_eq!(
            store.get(OUTPUT_KEY).map(|o| o.content).as_deref(),
            Some("12-15 June 2024")
        );
    }
}
