//! SQLite-backed report store.
//!
//! Provides persistent storage for:
//! - Citizen fault reports and their lifecycle fields
//! - Delegation teams
//!
//! Timestamps are stored as RFC 3339 text, booleans as 0/1 integers. Column
//! names match the wire names of the report record (`reporter_name`,
//! `fault_type`, `delegated_at`, ...).

use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};

use super::{ReportPatch, ReportStore};
use crate::error::StoreError;
use crate::report::{DelegationTeam, FaultReport, FaultType, ReportStatus, Severity};

/// SQLite database holding fault reports and delegation teams.
///
/// The connection sits behind a mutex so the store can be shared with the
/// background reminder task.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `~/.config/gridfault/gridfault.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = super::data_dir()?.join("gridfault.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS fault_reports (
                id                  TEXT PRIMARY KEY,
                reporter_name       TEXT NOT NULL,
                phone_number        TEXT NOT NULL,
                email               TEXT NOT NULL,
                location            TEXT NOT NULL,
                fault_type          TEXT NOT NULL,
                description         TEXT NOT NULL,
                severity            TEXT NOT NULL,
                status              TEXT NOT NULL DEFAULT 'pending',
                timestamp           TEXT NOT NULL,
                delegated_to        TEXT,
                delegated_at        TEXT,
                resolved_at         TEXT,
                delegated_warning   INTEGER NOT NULL DEFAULT 0,
                resolution_warning  INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS report_teams (
                name       TEXT PRIMARY KEY,
                specialty  TEXT NOT NULL,
                email      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_fault_reports_status ON fault_reports(status);
            CREATE INDEX IF NOT EXISTS idx_fault_reports_timestamp ON fault_reports(timestamp);",
        )
        .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::QueryFailed(format!("bad {column} timestamp '{value}': {e}")))
}

fn report_from_row(row: &Row<'_>) -> Result<FaultReport, StoreError> {
    let fault_type: String = row.get("fault_type")?;
    let severity: String = row.get("severity")?;
    let status: String = row.get("status")?;
    let timestamp: String = row.get("timestamp")?;
    let delegated_at: Option<String> = row.get("delegated_at")?;
    let resolved_at: Option<String> = row.get("resolved_at")?;

    Ok(FaultReport {
        id: row.get("id")?,
        reporter_name: row.get("reporter_name")?,
        phone_number: row.get("phone_number")?,
        email: row.get("email")?,
        location: row.get("location")?,
        fault_type: FaultType::from_str(&fault_type)
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?,
        description: row.get("description")?,
        severity: Severity::from_str(&severity)
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?,
        status: ReportStatus::from_str(&status)
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?,
        timestamp: parse_timestamp("timestamp", timestamp)?,
        delegated_to: row.get("delegated_to")?,
        delegated_at: delegated_at
            .map(|v| parse_timestamp("delegated_at", v))
            .transpose()?,
        resolved_at: resolved_at
            .map(|v| parse_timestamp("resolved_at", v))
            .transpose()?,
        delegated_warning: row.get::<_, i64>("delegated_warning")? != 0,
        resolution_warning: row.get::<_, i64>("resolution_warning")? != 0,
    })
}

const REPORT_COLUMNS: &str = "id, reporter_name, phone_number, email, location, fault_type, \
     description, severity, status, timestamp, delegated_to, delegated_at, \
     resolved_at, delegated_warning, resolution_warning";

impl ReportStore for Database {
    fn list_reports(&self) -> Result<Vec<FaultReport>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {REPORT_COLUMNS} FROM fault_reports ORDER BY timestamp"
        ))?;
        let mut rows = stmt.query([])?;
        let mut reports = Vec::new();
        while let Some(row) = rows.next()? {
            reports.push(report_from_row(row)?);
        }
        Ok(reports)
    }

    fn get_report(&self, id: &str) -> Result<FaultReport, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {REPORT_COLUMNS} FROM fault_reports WHERE id = ?1"
        ))?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => report_from_row(row),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    fn insert_report(&self, report: &FaultReport) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO fault_reports (id, reporter_name, phone_number, email, location,
                fault_type, description, severity, status, timestamp, delegated_to,
                delegated_at, resolved_at, delegated_warning, resolution_warning)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                report.id,
                report.reporter_name,
                report.phone_number,
                report.email,
                report.location,
                report.fault_type.as_str(),
                report.description,
                report.severity.as_str(),
                report.status.as_str(),
                report.timestamp.to_rfc3339(),
                report.delegated_to,
                report.delegated_at.map(|t| t.to_rfc3339()),
                report.resolved_at.map(|t| t.to_rfc3339()),
                report.delegated_warning as i64,
                report.resolution_warning as i64,
            ],
        )?;
        Ok(())
    }

    fn update_report(&self, id: &str, patch: &ReportPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = patch.status {
            sets.push("status = ?");
            values.push(Box::new(status.as_str().to_string()));
        }
        if let Some(ref team) = patch.delegated_to {
            sets.push("delegated_to = ?");
            values.push(Box::new(team.clone()));
        }
        if let Some(at) = patch.delegated_at {
            sets.push("delegated_at = ?");
            values.push(Box::new(at.to_rfc3339()));
        }
        if let Some(at) = patch.resolved_at {
            sets.push("resolved_at = ?");
            values.push(Box::new(at.to_rfc3339()));
        }
        if let Some(flag) = patch.delegated_warning {
            sets.push("delegated_warning = ?");
            values.push(Box::new(flag as i64));
        }
        if let Some(flag) = patch.resolution_warning {
            sets.push("resolution_warning = ?");
            values.push(Box::new(flag as i64));
        }
        values.push(Box::new(id.to_string()));

        let sql = format!(
            "UPDATE fault_reports SET {} WHERE id = ?",
            sets.join(", ")
        );
        let conn = self.lock()?;
        let changed = conn.execute(
            &sql,
            params_from_iter(values.iter().map(|v| v.as_ref() as &dyn ToSql)),
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn insert_team(&self, team: &DelegationTeam) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO report_teams (name, specialty, email) VALUES (?1, ?2, ?3)",
            params![team.name, team.specialty, team.email],
        )?;
        Ok(())
    }

    fn list_teams(&self) -> Result<Vec<DelegationTeam>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT name, specialty, email FROM report_teams ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(DelegationTeam {
                name: row.get(0)?,
                specialty: row.get(1)?,
                email: row.get(2)?,
            })
        })?;
        let mut teams = Vec::new();
        for team in rows {
            teams.push(team?);
        }
        Ok(teams)
    }
}
