//! CLI command definitions and dispatch.

pub mod class;
pub mod config;
pub mod dashboard;
pub mod room;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use roomhub_core::config::AppConfig;
use roomhub_core::error::AppError;
use roomhub_entity::snapshot::StoreSnapshot;
use roomhub_service::Scheduler;

use crate::output::OutputFormat;

/// RoomHub: classroom allocation engine
#[derive(Debug, Parser)]
#[command(name = "roomhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (falls back to ROOMHUB_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Environment overlay name, e.g. `development` (falls back to ROOMHUB_ENV)
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Room inventory management
    Room(room::RoomArgs),
    /// Class allocation and scheduling
    Class(class::ClassArgs),
    /// Per-period occupancy for a date
    Dashboard(dashboard::DashboardArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Room(args) => room::execute(args, config, self.format).await,
            Commands::Class(args) => class::execute(args, config, self.format).await,
            Commands::Dashboard(args) => dashboard::execute(args, config, self.format).await,
            Commands::Config(args) => config::execute(args, config, self.format).await,
        }
    }
}

/// Helper: open the scheduler over the configured store
pub async fn open_scheduler(config: &AppConfig) -> Result<Scheduler, AppError> {
    let store = roomhub_storage::build_store::<StoreSnapshot>(&config.storage).await?;
    Scheduler::open(store, &config.allocation).await
}

/// Helper: ask before a destructive action unless `force` is set
pub fn confirm(prompt: &str, force: bool) -> Result<bool, AppError> {
    if force {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))
}

/// Helper: collect dates given on the command line
pub fn date_set(dates: &[NaiveDate]) -> Result<BTreeSet<NaiveDate>, AppError> {
    if dates.is_empty() {
        return Err(AppError::validation("At least one date is required"));
    }
    Ok(dates.iter().copied().collect())
}
