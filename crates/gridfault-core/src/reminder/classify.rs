//! Staleness classifier.
//!
//! Pure mapping from a report plus the current time to zero or one
//! overdue-condition verdicts. The two conditions key off disjoint status
//! values, so a report can never produce both in one evaluation:
//!
//! - pending past the delegation threshold, not yet warned
//! - delegated past the resolution threshold, not yet warned
//!
//! Resolved reports are never evaluated.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::report::{FaultReport, ReportStatus};

/// Overdue thresholds, in minutes.
///
/// The defaults are the background engine's trigger pair (1 minute to
/// delegate, 2 minutes to resolve). The dashboard's looser advisory values
/// are not used for notification triggering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub delegate_overdue_min: i64,
    pub resolve_overdue_min: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            delegate_overdue_min: 1,
            resolve_overdue_min: 2,
        }
    }
}

/// Which fixed overdue condition a report is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdueKind {
    DelegationOverdue,
    ResolutionOverdue,
}

/// One overdue-condition verdict for one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub kind: OverdueKind,
    /// Elapsed minutes past the lifecycle timestamp, floored to an integer.
    pub overdue_minutes: i64,
}

/// Evaluate one report against the thresholds at time `now`.
///
/// Elapsed time is compared at full precision; `overdue_minutes` in the
/// verdict is floored for use in message bodies.
pub fn classify(report: &FaultReport, now: DateTime<Utc>, thresholds: &Thresholds) -> Option<Verdict> {
    match report.status {
        ReportStatus::Pending => {
            let elapsed = now - report.timestamp;
            if elapsed > Duration::minutes(thresholds.delegate_overdue_min)
                && !report.delegated_warning
            {
                return Some(Verdict {
                    kind: OverdueKind::DelegationOverdue,
                    overdue_minutes: elapsed.num_minutes(),
                });
            }
            None
        }
        ReportStatus::Delegated => {
            let delegated_at = report.delegated_at?;
            let elapsed = now - delegated_at;
            if elapsed > Duration::minutes(thresholds.resolve_overdue_min)
                && !report.resolution_warning
            {
                return Some(Verdict {
                    kind: OverdueKind::ResolutionOverdue,
                    overdue_minutes: elapsed.num_minutes(),
                });
            }
            None
        }
        ReportStatus::Resolved => None,
    }
}
