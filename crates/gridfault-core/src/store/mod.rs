//! Report storage.
//!
//! [`ReportStore`] is the seam between the reminder engine and whatever
//! system of record holds the reports. The engine only ever reads the full
//! report set and writes back individual fields; it never caches reports
//! across poll cycles.

pub mod database;

pub use database::Database;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::report::{DelegationTeam, FaultReport, ReportStatus};

/// Partial update applied to a stored report.
///
/// Only the fields the core is allowed to write back: lifecycle status,
/// delegation target and timestamps, and the two warning flags.
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    pub delegated_to: Option<String>,
    pub delegated_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub delegated_warning: Option<bool>,
    pub resolution_warning: Option<bool>,
}

impl ReportPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.delegated_to.is_none()
            && self.delegated_at.is_none()
            && self.resolved_at.is_none()
            && self.delegated_warning.is_none()
            && self.resolution_warning.is_none()
    }

    /// Patch recording a fired delegation-overdue notice.
    pub fn delegation_warned() -> Self {
        Self {
            delegated_warning: Some(true),
            ..Self::default()
        }
    }

    /// Patch recording a fired resolution-overdue notice.
    pub fn resolution_warned() -> Self {
        Self {
            resolution_warning: Some(true),
            ..Self::default()
        }
    }
}

/// Durable keyed storage of fault reports and delegation teams.
pub trait ReportStore: Send + Sync {
    /// Read the full current report collection.
    fn list_reports(&self) -> Result<Vec<FaultReport>, StoreError>;

    /// Fetch one report by id.
    fn get_report(&self, id: &str) -> Result<FaultReport, StoreError>;

    /// Persist a new report.
    fn insert_report(&self, report: &FaultReport) -> Result<(), StoreError>;

    /// Apply a partial update to the report with the given id.
    fn update_report(&self, id: &str, patch: &ReportPatch) -> Result<(), StoreError>;

    /// Persist a new delegation team.
    fn insert_team(&self, team: &DelegationTeam) -> Result<(), StoreError>;

    /// List all delegation teams.
    fn list_teams(&self) -> Result<Vec<DelegationTeam>, StoreError>;
}

/// Returns `~/.config/gridfault[-dev]/` based on GRIDFAULT_ENV.
///
/// Set GRIDFAULT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("GRIDFAULT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("gridfault-dev")
    } else {
        base_dir.join("gridfault")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
