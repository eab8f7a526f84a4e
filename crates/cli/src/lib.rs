pub mod commands;

use aptscout_core::TravelMode;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "aptscout",
    about = "Aptscout operator CLI",
    long_about = "Query the apartment inventory, check commutes through the maps server, \
                  and inspect configuration and runtime readiness.",
    after_help = "Examples:\n  aptscout search --city Austin --state TX --max-budget 2000\n  \
                  aptscout commute --origin 30.2672,-97.7431 --destination \"Austin-Bergstrom \
                  International Airport\"\n  aptscout doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Find up to 5 listings in a city and state at or under a monthly budget")]
    Search {
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long, allow_negative_numbers = true)]
        max_budget: f64,
    },
    #[command(about = "Batch distance and travel time from listing coordinates to one destination")]
    Commute {
        #[arg(long = "origin", required = true, help = "Origin as \"lat,lng\"; repeatable")]
        origins: Vec<String>,
        #[arg(long)]
        destination: String,
        #[arg(long, default_value = "driving", help = "driving, transit, walking or bicycling")]
        mode: TravelMode,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, dataset availability, and maps server readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Search { city, state, max_budget } => {
            commands::search::run(&city, &state, max_budget)
        }
        Command::Commute { origins, destination, mode } => {
            commands::commute::run(origins, &destination, mode)
        }
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
