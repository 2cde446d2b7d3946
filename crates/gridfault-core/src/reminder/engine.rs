//! Reminder engine.
//!
//! A background poll loop that nudges responsible parties when reports go
//! stale. On a fixed interval it re-fetches the full report set from the
//! store, classifies each report, dispatches a notification for every
//! newly-detected overdue condition, and persists the warning flag that
//! suppresses re-alerting.
//!
//! ## Lifecycle
//!
//! ```text
//! stopped -> running   on start()   (re-entrant safe, one timer)
//! running -> stopped   on stop()    (idempotent, in-flight cycle finishes)
//! ```
//!
//! Cycles never overlap: the timer and the cycle share one task, and timer
//! firings that land while a cycle is still running are skipped, not queued.
//!
//! ## Failure model
//!
//! Nothing in this engine is fatal. A fetch failure aborts the cycle and the
//! next firing retries from scratch. A notify failure leaves the warning
//! flag clear, so the same condition re-fires next cycle. A flag-persistence
//! failure after a successful notify also leaves the flag clear; the
//! accepted outcome is a duplicate notification rather than a lost one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::classify::{classify, OverdueKind, Thresholds, Verdict};
use crate::notify::{Notifier, RecipientRole};
use crate::report::FaultReport;
use crate::store::{ReportPatch, ReportStore};

/// Reminder engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Seconds between poll cycles.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Minutes a report may stay pending before the delegation reminder.
    #[serde(default = "default_delegate_overdue_min")]
    pub delegate_overdue_min: i64,
    /// Minutes a report may stay delegated before the resolution reminder.
    #[serde(default = "default_resolve_overdue_min")]
    pub resolve_overdue_min: i64,
    /// Delegation-overdue notices go here.
    #[serde(default = "default_escalation_email")]
    pub escalation_email: String,
    /// Resolution-overdue notices go here.
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
}

fn default_poll_interval_secs() -> u64 {
    2
}
fn default_delegate_overdue_min() -> i64 {
    1
}
fn default_resolve_overdue_min() -> i64 {
    2
}
fn default_escalation_email() -> String {
    "super-admin@localhost".to_string()
}
fn default_admin_email() -> String {
    "admin@localhost".to_string()
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            delegate_overdue_min: default_delegate_overdue_min(),
            resolve_overdue_min: default_resolve_overdue_min(),
            escalation_email: default_escalation_email(),
            admin_email: default_admin_email(),
        }
    }
}

impl ReminderConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            delegate_overdue_min: self.delegate_overdue_min,
            resolve_overdue_min: self.resolve_overdue_min,
        }
    }
}

struct Worker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Singleton-per-construction reminder loop with explicit start/stop.
///
/// Construct one at process startup and hand it to whatever owns the
/// top-level lifecycle. `start()` must be called from within a tokio
/// runtime.
pub struct ReminderEngine {
    store: Arc<dyn ReportStore>,
    notifier: Arc<dyn Notifier>,
    config: ReminderConfig,
    worker: Mutex<Option<Worker>>,
}

impl ReminderEngine {
    pub fn new(
        store: Arc<dyn ReportStore>,
        notifier: Arc<dyn Notifier>,
        config: ReminderConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
            worker: Mutex::new(None),
        }
    }

    fn worker_slot(&self) -> MutexGuard<'_, Option<Worker>> {
        self.worker.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Begin the repeating poll timer. Returns `false` if already running
    /// (no second timer is created).
    pub fn start(&self) -> bool {
        let mut slot = self.worker_slot();
        if slot.is_some() {
            debug!("reminder engine already running");
            return false;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        let config = self.config.clone();

        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(config.poll_interval_secs.max(1));
            let mut ticker = time::interval(period);
            // A firing that lands while a cycle is still running is
            // dropped, not queued.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                // Shutdown must win over a tick that went ready while a
                // cycle was in flight; a deferred tick never starts a new
                // cycle after stop().
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                        run_cycle(store.as_ref(), notifier.as_ref(), &config).await;
                    }
                }
            }
            debug!("reminder loop exited");
        });

        *slot = Some(Worker { shutdown, handle });
        info!(
            interval_secs = self.config.poll_interval_secs,
            "reminder engine started"
        );
        true
    }

    /// Cancel the timer. An in-flight cycle finishes; no new cycle starts.
    /// Safe to call repeatedly.
    pub fn stop(&self) {
        let mut slot = self.worker_slot();
        if let Some(worker) = slot.take() {
            let _ = worker.shutdown.send(true);
            // The task breaks out of its loop once the in-flight cycle (if
            // any) completes; it is not aborted mid-dispatch.
            drop(worker.handle);
            info!("reminder engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker_slot().is_some()
    }

    /// Run a single poll cycle immediately, outside the timer.
    pub async fn run_cycle(&self) {
        run_cycle(self.store.as_ref(), self.notifier.as_ref(), &self.config).await;
    }
}

impl Drop for ReminderEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One poll cycle: fetch ground truth, classify, dispatch, persist flags.
async fn run_cycle(store: &dyn ReportStore, notifier: &dyn Notifier, config: &ReminderConfig) {
    let reports = match store.list_reports() {
        Ok(reports) => reports,
        Err(e) => {
            warn!(error = %e, "skipping reminder cycle: failed to list reports");
            return;
        }
    };

    let now = Utc::now();
    let thresholds = config.thresholds();
    for report in &reports {
        if let Some(verdict) = classify(report, now, &thresholds) {
            dispatch(store, notifier, config, report, verdict).await;
        }
    }
}

/// Send the notification for one verdict and, on success, persist the
/// matching warning flag. Failures are logged and isolated to this report.
async fn dispatch(
    store: &dyn ReportStore,
    notifier: &dyn Notifier,
    config: &ReminderConfig,
    report: &FaultReport,
    verdict: Verdict,
) {
    let (recipient, address, body, patch) = match verdict.kind {
        OverdueKind::DelegationOverdue => (
            RecipientRole::SuperAdmin,
            config.escalation_email.as_str(),
            delegation_overdue_body(report, verdict.overdue_minutes),
            ReportPatch::delegation_warned(),
        ),
        OverdueKind::ResolutionOverdue => (
            RecipientRole::Admin,
            config.admin_email.as_str(),
            resolution_overdue_body(report, verdict.overdue_minutes),
            ReportPatch::resolution_warned(),
        ),
    };

    match notifier.notify(recipient, address, &body).await {
        Ok(()) => match store.update_report(&report.id, &patch) {
            Ok(()) => {
                info!(
                    report_id = %report.id,
                    kind = ?verdict.kind,
                    overdue_minutes = verdict.overdue_minutes,
                    "reminder sent"
                );
            }
            Err(e) => {
                // Flag stays clear, so this verdict re-fires next cycle.
                warn!(
                    report_id = %report.id,
                    kind = ?verdict.kind,
                    error = %e,
                    "reminder sent but warning flag not persisted"
                );
            }
        },
        Err(e) => {
            warn!(
                report_id = %report.id,
                kind = ?verdict.kind,
                error = %e,
                "reminder dispatch failed"
            );
        }
    }
}

fn delegation_overdue_body(report: &FaultReport, minutes: i64) -> String {
    format!(
        "Report ID: {}\nLocation: {}\nThis report has not been delegated for {} minutes.\n\
         Please assign an admin to handle this report as soon as possible.",
        report.id, report.location, minutes
    )
}

fn resolution_overdue_body(report: &FaultReport, minutes: i64) -> String {
    format!(
        "Report ID: {}\nLocation: {}\nThis report has not been resolved for {} minutes.\n\
         Please confirm the resolution status of this report.",
        report.id, report.location, minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotifyError, StoreError};
    use crate::report::DelegationTeam;
    use async_trait::async_trait;

    struct EmptyStore;

    impl ReportStore for EmptyStore {
        fn list_reports(&self) -> Result<Vec<FaultReport>, StoreError> {
            Ok(Vec::new())
        }
        fn get_report(&self, id: &str) -> Result<FaultReport, StoreError> {
            Err(StoreError::NotFound(id.to_string()))
        }
        fn insert_report(&self, _report: &FaultReport) -> Result<(), StoreError> {
            Ok(())
        }
        fn update_report(&self, _id: &str, _patch: &ReportPatch) -> Result<(), StoreError> {
            Ok(())
        }
        fn insert_team(&self, _team: &DelegationTeam) -> Result<(), StoreError> {
            Ok(())
        }
        fn list_teams(&self) -> Result<Vec<DelegationTeam>, StoreError> {
            Ok(Vec::new())
        }
    }

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn notify(
            &self,
            _recipient: RecipientRole,
            _address: &str,
            _body: &str,
        ) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    fn engine() -> ReminderEngine {
        ReminderEngine::new(
            Arc::new(EmptyStore),
            Arc::new(NullNotifier),
            ReminderConfig::default(),
        )
    }

    #[tokio::test]
    async fn start_is_reentrant_safe() {
        let engine = engine();
        assert!(!engine.is_running());
        assert!(engine.start());
        assert!(engine.is_running());
        assert!(!engine.start()); // Second start creates no second timer.
        engine.stop();
        assert!(!engine.is_running());
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let engine = engine();
        engine.stop(); // Stopping a stopped engine is a no-op.
        assert!(engine.start());
        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
        // The engine can be started again after a stop.
        assert!(engine.start());
        engine.stop();
    }

    #[test]
    fn message_bodies_carry_id_location_and_minutes() {
        let now = Utc::now();
        let report = FaultReport::submit(
            crate::report::NewReport {
                reporter_name: "Ada".to_string(),
                phone_number: "555-0100".to_string(),
                email: "ada@example.com".to_string(),
                location: "Main St & 4th".to_string(),
                fault_type: crate::report::FaultType::PowerOutage,
                description: "Whole block dark".to_string(),
            },
            now,
        );

        let body = delegation_overdue_body(&report, 7);
        assert!(body.contains(&report.id));
        assert!(body.contains("Main St & 4th"));
        assert!(body.contains("not been delegated for 7 minutes"));

        let body = resolution_overdue_body(&report, 12);
        assert!(body.contains("not been resolved for 12 minutes"));
        assert!(body.contains("confirm the resolution status"));
    }

    #[test]
    fn config_defaults_match_engine_trigger_pair() {
        let config = ReminderConfig::default();
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.thresholds(), Thresholds::default());
    }
}
