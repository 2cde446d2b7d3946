use chrono::Utc;
use gridfault_core::store::{ReportPatch, ReportStore};
use gridfault_core::Database;

/// Assign a pending report to a responder team.
///
/// Sets `status = delegated`, `delegated_to` and `delegated_at` in one
/// write, after the domain transition has validated the lifecycle.
pub fn run(report_id: &str, team: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    if !db.list_teams()?.iter().any(|t| t.name == team) {
        return Err(format!("unknown team: {team}").into());
    }

    let mut report = db.get_report(report_id)?;
    let now = Utc::now();
    report.delegate(team, now)?;

    db.update_report(
        report_id,
        &ReportPatch {
            status: Some(report.status),
            delegated_to: report.delegated_to.clone(),
            delegated_at: report.delegated_at,
            ..ReportPatch::default()
        },
    )?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
