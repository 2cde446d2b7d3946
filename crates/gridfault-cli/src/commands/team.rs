use clap::Subcommand;
use gridfault_core::store::ReportStore;
use gridfault_core::{Database, DelegationTeam};

#[derive(Subcommand)]
pub enum TeamAction {
    /// Register a responder team
    Add {
        /// Team name
        #[arg(long)]
        name: String,
        /// Fault specialty, e.g. cable-damage
        #[arg(long)]
        specialty: String,
        /// Contact email
        #[arg(long)]
        email: String,
    },
    /// List teams as JSON
    List,
}

pub fn run(action: TeamAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TeamAction::Add {
            name,
            specialty,
            email,
        } => {
            let team = DelegationTeam {
                name,
                specialty,
                email,
            };
            db.insert_team(&team)?;
            println!("{}", serde_json::to_string_pretty(&team)?);
        }
        TeamAction::List => {
            let teams = db.list_teams()?;
            println!("{}", serde_json::to_string_pretty(&teams)?);
        }
    }

    Ok(())
}
