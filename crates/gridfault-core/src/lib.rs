//! # Gridfault Core Library
//!
//! Core business logic for Gridfault, a citizen fault-reporting system for
//! electrical infrastructure. Citizens report faults; staff delegate them to
//! responder teams and confirm resolution; a background reminder engine
//! nudges the responsible party when a report goes stale.
//!
//! ## Architecture
//!
//! - **Report model**: forward-only lifecycle (`pending -> delegated ->
//!   resolved`) with once-set timestamps and monotonic warning flags
//! - **Report store**: SQLite system of record behind the [`ReportStore`]
//!   trait; the engine re-fetches ground truth every cycle
//! - **Staleness classifier**: pure function mapping a report + now to at
//!   most one overdue verdict
//! - **Reminder engine**: non-overlapping poll loop with explicit
//!   start/stop, at-most-once notification per condition under successful
//!   flag persistence
//! - **Notifier**: single "send notification" capability backed by an HTTP
//!   mail relay
//!
//! ## Key Components
//!
//! - [`FaultReport`]: one citizen-submitted incident
//! - [`Database`]: SQLite report and team persistence
//! - [`ReminderEngine`]: the background poll loop
//! - [`Config`]: application configuration

pub mod config;
pub mod error;
pub mod notify;
pub mod reminder;
pub mod report;
pub mod store;

pub use config::{Config, NotifierConfig};
pub use error::{ConfigError, CoreError, NotifyError, StoreError, ValidationError};
pub use notify::{EmailNotifier, Notifier, RecipientRole};
pub use reminder::{classify, OverdueKind, ReminderConfig, ReminderEngine, Thresholds, Verdict};
pub use report::{
    DelegationTeam, FaultReport, FaultType, NewReport, ReportStatus, Severity,
};
pub use store::{Database, ReportPatch, ReportStore};
