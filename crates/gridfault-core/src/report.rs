//! Fault report domain model.
//!
//! A [`FaultReport`] is one citizen-submitted incident. Its lifecycle is a
//! forward-only state machine:
//!
//! ```text
//! Pending -> Delegated -> Resolved
//! ```
//!
//! Lifecycle timestamps (`delegated_at`, `resolved_at`) are set exactly once
//! on the corresponding transition. The two warning flags are monotonic
//! (false -> true only) and gated on the status under which they make sense:
//! `delegated_warning` while pending, `resolution_warning` while delegated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Problem catalog for citizen submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultType {
    PowerOutage,
    TransformerFault,
    CableDamage,
    VoltageFluctuation,
    StreetLight,
    Other,
}

impl FaultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultType::PowerOutage => "power-outage",
            FaultType::TransformerFault => "transformer-fault",
            FaultType::CableDamage => "cable-damage",
            FaultType::VoltageFluctuation => "voltage-fluctuation",
            FaultType::StreetLight => "street-light",
            FaultType::Other => "other",
        }
    }

    /// Severity assigned at submission time based on fault category.
    pub fn default_severity(&self) -> Severity {
        match self {
            FaultType::TransformerFault => Severity::Critical,
            FaultType::PowerOutage | FaultType::CableDamage => Severity::High,
            FaultType::VoltageFluctuation => Severity::Medium,
            FaultType::StreetLight | FaultType::Other => Severity::Low,
        }
    }
}

impl std::str::FromStr for FaultType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "power-outage" => Ok(FaultType::PowerOutage),
            "transformer-fault" => Ok(FaultType::TransformerFault),
            "cable-damage" => Ok(FaultType::CableDamage),
            "voltage-fluctuation" => Ok(FaultType::VoltageFluctuation),
            "street-light" => Ok(FaultType::StreetLight),
            "other" => Ok(FaultType::Other),
            _ => Err(ValidationError::InvalidValue {
                field: "fault_type".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(ValidationError::InvalidValue {
                field: "severity".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Delegated,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Delegated => "delegated",
            ReportStatus::Resolved => "resolved",
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "delegated" => Ok(ReportStatus::Delegated),
            "resolved" => Ok(ReportStatus::Resolved),
            _ => Err(ValidationError::InvalidValue {
                field: "status".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Fields supplied by the citizen at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub reporter_name: String,
    pub phone_number: String,
    pub email: String,
    pub location: String,
    pub fault_type: FaultType,
    pub description: String,
}

/// One citizen-submitted fault incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultReport {
    pub id: String,
    pub reporter_name: String,
    pub phone_number: String,
    pub email: String,
    pub location: String,
    pub fault_type: FaultType,
    pub description: String,
    pub severity: Severity,
    pub status: ReportStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub delegated_to: Option<String>,
    #[serde(default)]
    pub delegated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delegated_warning: bool,
    #[serde(default)]
    pub resolution_warning: bool,
}

impl FaultReport {
    /// Create a pending report from a citizen submission.
    ///
    /// Severity is derived from the fault type; the id is a fresh UUID.
    pub fn submit(new: NewReport, at: DateTime<Utc>) -> Self {
        let severity = new.fault_type.default_severity();
        Self {
            id: Uuid::new_v4().to_string(),
            reporter_name: new.reporter_name,
            phone_number: new.phone_number,
            email: new.email,
            location: new.location,
            fault_type: new.fault_type,
            description: new.description,
            severity,
            status: ReportStatus::Pending,
            timestamp: at,
            delegated_to: None,
            delegated_at: None,
            resolved_at: None,
            delegated_warning: false,
            resolution_warning: false,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Assign the report to a responder team. Pending reports only.
    pub fn delegate(&mut self, team: &str, at: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.status != ReportStatus::Pending {
            return Err(ValidationError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: ReportStatus::Delegated.as_str().to_string(),
            });
        }
        self.status = ReportStatus::Delegated;
        self.delegated_to = Some(team.to_string());
        self.delegated_at = Some(at);
        Ok(())
    }

    /// Confirm resolution. Delegated reports only.
    pub fn resolve(&mut self, at: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.status != ReportStatus::Delegated {
            return Err(ValidationError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: ReportStatus::Resolved.as_str().to_string(),
            });
        }
        self.status = ReportStatus::Resolved;
        self.resolved_at = Some(at);
        Ok(())
    }

    // ── Warning flags ────────────────────────────────────────────────

    /// Record that a delegation-overdue notice has fired.
    /// Only valid while the report is still pending.
    pub fn mark_delegation_warned(&mut self) -> Result<(), ValidationError> {
        if self.status != ReportStatus::Pending {
            return Err(ValidationError::WarningNotApplicable {
                warning: "delegated_warning".to_string(),
                status: self.status.as_str().to_string(),
            });
        }
        self.delegated_warning = true;
        Ok(())
    }

    /// Record that a resolution-overdue notice has fired.
    /// Only valid while the report is delegated.
    pub fn mark_resolution_warned(&mut self) -> Result<(), ValidationError> {
        if self.status != ReportStatus::Delegated {
            return Err(ValidationError::WarningNotApplicable {
                warning: "resolution_warning".to_string(),
                status: self.status.as_str().to_string(),
            });
        }
        self.resolution_warning = true;
        Ok(())
    }
}

/// A responder entity usable as a delegation target.
///
/// Teams have no lifecycle beyond creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationTeam {
    pub name: String,
    pub specialty: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending_report() -> FaultReport {
        FaultReport::submit(
            NewReport {
                reporter_name: "Ada".to_string(),
                phone_number: "555-0100".to_string(),
                email: "ada@example.com".to_string(),
                location: "Main St & 4th".to_string(),
                fault_type: FaultType::PowerOutage,
                description: "Whole block dark".to_string(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn submit_derives_severity_from_fault_type() {
        let report = pending_report();
        assert_eq!(report.severity, Severity::High);
        assert_eq!(report.status, ReportStatus::Pending);
        assert!(report.delegated_at.is_none());
        assert!(report.resolved_at.is_none());

        assert_eq!(
            FaultType::TransformerFault.default_severity(),
            Severity::Critical
        );
        assert_eq!(FaultType::StreetLight.default_severity(), Severity::Low);
    }

    #[test]
    fn lifecycle_is_forward_only() {
        let mut report = pending_report();
        let now = Utc::now();

        assert!(report.resolve(now).is_err()); // Cannot skip delegation.

        report.delegate("Line Crew A", now).unwrap();
        assert_eq!(report.status, ReportStatus::Delegated);
        assert_eq!(report.delegated_to.as_deref(), Some("Line Crew A"));
        assert!(report.delegated_at.is_some());

        assert!(report.delegate("Line Crew B", now).is_err()); // No re-delegation.

        report.resolve(now).unwrap();
        assert_eq!(report.status, ReportStatus::Resolved);
        assert!(report.resolved_at.is_some());

        assert!(report.resolve(now).is_err());
    }

    #[test]
    fn delegation_warning_only_while_pending() {
        let mut report = pending_report();
        report.mark_delegation_warned().unwrap();
        assert!(report.delegated_warning);

        report.delegate("Line Crew A", Utc::now()).unwrap();
        assert!(report.mark_delegation_warned().is_err());
    }

    #[test]
    fn resolution_warning_only_while_delegated() {
        let mut report = pending_report();
        assert!(report.mark_resolution_warned().is_err());

        report.delegate("Line Crew A", Utc::now()).unwrap();
        report.mark_resolution_warned().unwrap();
        assert!(report.resolution_warning);

        report.resolve(Utc::now()).unwrap();
        assert!(report.mark_resolution_warned().is_err());
    }

    #[test]
    fn enum_wire_names_round_trip() {
        assert_eq!(
            serde_json::to_string(&FaultType::VoltageFluctuation).unwrap(),
            "\"voltage-fluctuation\""
        );
        assert_eq!(
            serde_json::to_string(&ReportStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: FaultType = "street-light".parse().unwrap();
        assert_eq!(parsed, FaultType::StreetLight);
        assert!("lightning".parse::<FaultType>().is_err());
    }
}
