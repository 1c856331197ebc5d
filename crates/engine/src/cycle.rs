//! Cycle scheduling and pacing.

use crate::check::check_route;
use crate::schedule::{is_weekday, next_qualifying_dates};
use chrono::{Local, NaiveDate};
use farewatch_alerts::{AlertPolicy, Notifier};
use farewatch_core::{Money, RouteSpec};
use farewatch_source::FareSource;
use farewatch_store::{Store, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Injectable qualifying-date predicate.
pub type DatePredicate = Box<dyn Fn(NaiveDate) -> bool + Send + Sync>;

/// Monitoring configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Alert on fares strictly below this amount.
    pub threshold: Money,
    /// Sleep between full cycles in continuous mode.
    pub check_interval: Duration,
    /// Suppression window for repeat alerts on the same train.
    pub dedup_window_hours: i64,
    /// How many qualifying travel dates each cycle covers.
    pub dates_per_cycle: usize,
    /// Courtesy delay between consecutive source queries.
    pub pacing: Duration,
    /// Wait after a failed cycle; longer than the pacing delay, shorter
    /// than the cycle interval.
    pub backoff: Duration,
    /// Routes checked in declared order, once per qualifying date.
    pub routes: Vec<RouteSpec>,
    /// Forwarded to the fare-source session.
    pub headless: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold: Money::from_parts(20, 0),
            check_interval: Duration::from_secs(120 * 60),
            dedup_window_hours: 24,
            dates_per_cycle: 5,
            pacing: Duration::from_secs(3),
            backoff: Duration::from_secs(300),
            routes: Vec::new(),
            headless: true,
        }
    }
}

/// Drives repeated monitoring cycles over the configured routes.
///
/// Checks run strictly in sequence; there is never more than one query in
/// flight against the fare source.
pub struct MonitoringCycle<S, N> {
    config: MonitorConfig,
    store: Store,
    source: S,
    notifier: N,
    policy: AlertPolicy,
    qualifies: DatePredicate,
    shutdown: Arc<AtomicBool>,
}

impl<S: FareSource, N: Notifier> MonitoringCycle<S, N> {
    pub fn new(config: MonitorConfig, store: Store, source: S, notifier: N) -> Self {
        let policy = AlertPolicy::new(config.threshold, config.dedup_window_hours);
        Self {
            config,
            store,
            source,
            notifier,
            policy,
            qualifies: Box::new(is_weekday),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the qualifying-date predicate (default: weekdays).
    pub fn with_date_predicate(mut self, qualifies: DatePredicate) -> Self {
        self.qualifies = qualifies;
        self
    }

    /// Flag checked between route checks. Setting it makes the cycle
    /// finish the in-flight check, release the source session and return.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    fn interrupted(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Run one full cycle over the upcoming qualifying dates.
    ///
    /// The source session is released before returning, on success and on
    /// error alike; it is never carried across cycles.
    pub async fn run_once(&mut self) -> Result<(), StoreError> {
        let result = self.run_cycle(Local::now().date_naive()).await;
        self.source.close().await;
        result
    }

    async fn run_cycle(&mut self, from: NaiveDate) -> Result<(), StoreError> {
        let dates = next_qualifying_dates(from, self.config.dates_per_cycle, &self.qualifies);
        info!(
            dates = dates.len(),
            routes = self.config.routes.len(),
            "starting monitoring cycle"
        );

        let total = dates.len() * self.config.routes.len();
        let mut done = 0usize;
        for date in &dates {
            info!(date = %date.format("%A, %B %d, %Y"), "checking travel date");
            for spec in &self.config.routes {
                if self.interrupted() {
                    info!("interrupt requested, ending cycle early");
                    return Ok(());
                }
                let found = check_route(
                    &mut self.source,
                    &self.store,
                    &self.notifier,
                    &self.policy,
                    spec,
                    *date,
                )
                .await?;
                info!(route = %spec.label, date = %date, found = found.len(), "route check complete");
                done += 1;
                if done < total {
                    self.sleep_interruptible(self.config.pacing).await;
                }
            }
        }

        info!("monitoring cycle complete");
        Ok(())
    }

    /// Run cycles until the shutdown flag is set.
    ///
    /// A failed cycle is logged and retried after the backoff; only
    /// operator interruption stops the loop.
    pub async fn run_forever(&mut self) {
        info!(
            interval_secs = self.config.check_interval.as_secs(),
            threshold = %self.config.threshold,
            "starting continuous monitoring"
        );

        while !self.interrupted() {
            match self.run_once().await {
                Ok(()) => {
                    if self.interrupted() {
                        break;
                    }
                    let next = Local::now()
                        + chrono::Duration::seconds(self.config.check_interval.as_secs() as i64);
                    info!(next_check = %next.format("%I:%M %p"), "sleeping until next cycle");
                    self.sleep_interruptible(self.config.check_interval).await;
                }
                Err(e) => {
                    error!(error = %e, "monitoring cycle failed");
                    self.sleep_interruptible(self.config.backoff).await;
                }
            }
        }

        info!("continuous monitoring stopped");
    }

    /// Sleep in short slices so an interrupt is honored promptly.
    async fn sleep_interruptible(&self, total: Duration) {
        let mut remaining = total;
        while !self.interrupted() && !remaining.is_zero() {
            let step = remaining.min(Duration::from_secs(1));
            tokio::time::sleep(step).await;
            remaining -= step;
        }
    }
}
