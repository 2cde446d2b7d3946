//! Staleness classification and the background reminder loop.

mod classify;
mod engine;

pub use classify::{classify, OverdueKind, Thresholds, Verdict};
pub use engine::{ReminderConfig, ReminderEngine};
