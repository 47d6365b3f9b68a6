use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use cra::commands::{self, ConfigUpdate, ExportRequest, SourceMode};
use cra::utils::validate_units;
use cra::{interactive, logging, Config, Period};

#[derive(Parser)]
#[command(name = "cra")]
#[command(about = "Monthly activity report generator", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the days of a month with weekends and public holidays
    Show {
        /// Month to show (YYYY-MM or MM/YYYY, default: current month)
        #[arg(short, long)]
        month: Option<Period>,

        /// Use cached holidays only, never the network
        #[arg(long)]
        offline: bool,
    },
    /// Write the report of a month as a PDF
    Export {
        /// Month to export (YYYY-MM or MM/YYYY, default: current month)
        #[arg(short, long)]
        month: Option<Period>,

        /// Units written on every working day (e.g. 0.5)
        #[arg(short, long, value_parser = parse_fill)]
        fill: Option<f64>,

        /// Activity of one day as DATE=UNITS, applied after --fill (repeatable)
        #[arg(short, long = "set", value_name = "DATE=UNITS")]
        set: Vec<String>,

        /// Output directory (default: configured output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use cached holidays only, never the network
        #[arg(long)]
        offline: bool,
    },
    /// List the public holidays of a year
    Holidays {
        /// Year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Fetch again even when the year is cached
        #[arg(short, long)]
        refresh: bool,
    },
    /// Show or update the configuration
    Config {
        #[arg(long)]
        employee_name: Option<String>,

        #[arg(long)]
        employee_email: Option<String>,

        #[arg(long)]
        company_name: Option<String>,

        #[arg(long)]
        manager_name: Option<String>,

        #[arg(long)]
        manager_email: Option<String>,

        /// Directory where reports are written
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Base URL of the public holiday provider
        #[arg(long)]
        holiday_api_url: Option<String>,
    },
}

fn parse_fill(text: &str) -> std::result::Result<f64, String> {
    validate_units(text).map_err(|e| e.to_string())
}

fn source_mode(offline: bool) -> SourceMode {
    if offline {
        SourceMode::Offline
    } else {
        SourceMode::Cached
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        if let Err(e) = logging::init_with_file("cra.log") {
            eprintln!("Warning: file logging unavailable: {}", e);
        }
        return interactive::run_interactive().await;
    };

    logging::init();
    let config = Config::load()?;

    match command {
        Commands::Show { month, offline } => {
            let period = month.unwrap_or_else(Period::current);
            commands::show(&config, period, source_mode(offline)).await?;
        }
        Commands::Export {
            month,
            fill,
            set,
            output,
            offline,
        } => {
            let period = month.unwrap_or_else(Period::current);
            let request = ExportRequest {
                fill,
                assignments: set,
                output_dir: output,
            };
            commands::export(&config, period, &request, source_mode(offline)).await?;
        }
        Commands::Holidays { year, refresh } => {
            let year = year.unwrap_or_else(|| Period::current().year());
            let mode = if refresh {
                SourceMode::Refresh
            } else {
                SourceMode::Cached
            };
            commands::holidays(&config, year, mode).await?;
        }
        Commands::Config {
            employee_name,
            employee_email,
            company_name,
            manager_name,
            manager_email,
            output_dir,
            holiday_api_url,
        } => {
            let update = ConfigUpdate {
                employee_name,
                employee_email,
                company_name,
                manager_name,
                manager_email,
                output_dir,
                holiday_api_url,
            };
            commands::configure(config, update)?;
        }
    }

    Ok(())
}
