use std::str::FromStr;

use chrono::Utc;
use clap::Subcommand;
use gridfault_core::store::ReportStore;
use gridfault_core::{Database, FaultReport, FaultType, NewReport, ReportStatus};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Submit a new fault report
    Submit {
        /// Reporter's name
        #[arg(long)]
        reporter: String,
        /// Reporter's phone number
        #[arg(long)]
        phone: String,
        /// Reporter's email
        #[arg(long)]
        email: String,
        /// Street address, landmarks, area name
        #[arg(long)]
        location: String,
        /// One of: power-outage, transformer-fault, cable-damage,
        /// voltage-fluctuation, street-light, other
        #[arg(long)]
        fault_type: String,
        /// Free-text description of the issue
        #[arg(long)]
        description: String,
    },
    /// List reports as JSON
    List {
        /// Filter by status: pending, delegated or resolved
        #[arg(long)]
        status: Option<String>,
    },
    /// Print one report as JSON
    Show {
        /// Report id
        id: String,
    },
}

pub fn run(action: ReportAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ReportAction::Submit {
            reporter,
            phone,
            email,
            location,
            fault_type,
            description,
        } => {
            let report = FaultReport::submit(
                NewReport {
                    reporter_name: reporter,
                    phone_number: phone,
                    email,
                    location,
                    fault_type: FaultType::from_str(&fault_type)?,
                    description,
                },
                Utc::now(),
            );
            db.insert_report(&report)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportAction::List { status } => {
            let filter = status
                .as_deref()
                .map(ReportStatus::from_str)
                .transpose()?;
            let reports: Vec<_> = db
                .list_reports()?
                .into_iter()
                .filter(|r| filter.map_or(true, |s| r.status == s))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        ReportAction::Show { id } => {
            let report = db.get_report(&id)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
