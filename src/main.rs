mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cli::{agenda::AgendaArgs, one_off::OneOffCommands, status::StatusArgs};

/// orchard - Recurring order, pack and delivery scheduling
#[derive(Parser)]
#[command(name = "orchard")]
#[command(about = "Plan expected orders, packs and deliveries for wholesale customers", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage customers
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Show the agenda for a day, week or month
    Agenda(AgendaArgs),
    /// Mark a scheduled item as done, skipped or pending
    Status(StatusArgs),
    /// Manage one-off items
    OneOff {
        #[command(subcommand)]
        command: OneOffCommands,
    },
    /// Convert stored day indices from Sunday = 0 to Monday = 0
    MigrateDays {
        /// Must be exactly MIGRATE
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// Import customers from a JSON file
    Load { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = orchard::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    orchard::observability::init_observability(
        "orchard",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Migrate => cli::database::migrate(&config).await,
        Commands::Reset => cli::database::reset(&config).await,
        Commands::Customers {
            command: CustomerCommands::Load { file },
        } => cli::customers::load(&config, file).await,
        Commands::Agenda(args) => cli::agenda::show(&config, args).await,
        Commands::Status(args) => cli::status::set(&config, args).await,
        Commands::OneOff { command } => cli::one_off::run(&config, command).await,
        Commands::MigrateDays { confirm } => cli::migrate_days::run(&config, confirm).await,
    }
}
