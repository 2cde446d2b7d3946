use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gridfault", version, about = "Gridfault CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fault report submission and inspection
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },
    /// Delegation team management
    Team {
        #[command(subcommand)]
        action: commands::team::TeamAction,
    },
    /// Assign a pending report to a responder team
    Delegate {
        /// Report id
        report_id: String,
        /// Team name the report goes to
        team: String,
    },
    /// Confirm resolution of a delegated report
    Resolve {
        /// Report id
        report_id: String,
    },
    /// Run the background reminder engine in the foreground
    Watch,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Report { action } => commands::report::run(action),
        Commands::Team { action } => commands::team::run(action),
        Commands::Delegate { report_id, team } => commands::delegate::run(&report_id, &team),
        Commands::Resolve { report_id } => commands::resolve::run(&report_id),
        Commands::Watch => commands::watch::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
