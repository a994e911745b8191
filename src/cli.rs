//! CLI interface for pantry-budget

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::allocation;
use crate::config::{self, Config};
use crate::schedule::TripSchedule;
use crate::store::BudgetStore;

#[derive(Parser)]
#[command(name = "pantry-budget")]
#[command(about = "Household shopping budget tracker with per-trip allocation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default when no command given)
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,
    },
    /// Show the current budget and per-trip allocation
    Show,
    /// Set the remaining budget
    Set {
        /// New remaining budget amount
        amount: f64,
    },
    /// Reset the budget to the configured default
    Reset,
    /// Configure the tracker
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the default budget restored on reset
        #[arg(long)]
        set_default_budget: Option<f64>,
        /// Set the hour after which today's trip counts as taken (0-23)
        #[arg(long)]
        set_cutoff_hour: Option<u32>,
        /// Set the mascot image URL cached at startup
        #[arg(long)]
        set_mascot_url: Option<String>,
    },
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => serve(None, None).await,
        Some(Commands::Serve { port, host }) => serve(port, host).await,
        Some(Commands::Show) => show(),
        Some(Commands::Set { amount }) => set(amount),
        Some(Commands::Reset) => reset(),
        Some(Commands::Config {
            show,
            set_default_budget,
            set_cutoff_hour,
            set_mascot_url,
        }) => {
            let mut handled = false;

            if let Some(amount) = set_default_budget {
                config::set_default_budget(amount)?;
                handled = true;
            }
            if let Some(hour) = set_cutoff_hour {
                config::set_cutoff_hour(hour)?;
                handled = true;
            }
            if let Some(url) = set_mascot_url {
                config::set_mascot_url(&url)?;
                handled = true;
            }
            if show || !handled {
                config::show_config()?;
            }

            Ok(())
        }
    }
}

async fn serve(port: Option<u16>, host: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    crate::server::start(&host, port).await
}

fn show() -> Result<()> {
    let config = Config::load()?;
    let schedule = TripSchedule::from_config(&config.schedule)?;
    let store = BudgetStore::new(config.budget.default_amount())?;

    let state = store.load();
    let trips = schedule.remaining_trips(Local::now());
    let per_trip = allocation::per_trip(state.remaining_budget, trips);

    println!("Remaining budget: {:.2} EUR", state.remaining_budget);
    println!("Remaining trips:  {} on {}", trips, schedule);
    println!("Per trip:         {:.2} EUR", per_trip);
    println!("Last updated:     {}", state.last_updated.format("%Y-%m-%d %H:%M"));

    Ok(())
}

fn set(amount: f64) -> Result<()> {
    let Some(amount) = Decimal::from_f64_retain(amount) else {
        bail!("Amount {} is not representable", amount);
    };

    let config = Config::load()?;
    let store = BudgetStore::new(config.budget.default_amount())?;
    let state = store.update_amount(amount)?;

    let schedule = TripSchedule::from_config(&config.schedule)?;
    let trips = schedule.remaining_trips(Local::now());
    let per_trip = allocation::per_trip(state.remaining_budget, trips);

    println!("Remaining budget set to {:.2} EUR", state.remaining_budget);
    println!("That is {:.2} EUR for each of the {} trips left", per_trip, trips);

    Ok(())
}

fn reset() -> Result<()> {
    let config = Config::load()?;
    let store = BudgetStore::new(config.budget.default_amount())?;
    let state = store.reset()?;

    println!("Budget reset to {:.2} EUR", state.remaining_budget);

    Ok(())
}
