use chrono::Utc;
use gridfault_core::store::{ReportPatch, ReportStore};
use gridfault_core::Database;

/// Confirm resolution of a delegated report.
pub fn run(report_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    let mut report = db.get_report(report_id)?;
    report.resolve(Utc::now())?;

    db.update_report(
        report_id,
        &ReportPatch {
            status: Some(report.status),
            resolved_at: report.resolved_at,
            ..ReportPatch::default()
        },
    )?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
