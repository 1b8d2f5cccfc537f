//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use roomhub_core::config::AppConfig;
use roomhub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration after files and environment are merged
    Show,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config, "{}"),
            OutputFormat::Table => {
                output::print_kv("storage.backend", &config.storage.backend.to_string());
                output::print_kv("storage.path", &config.storage.path);
                output::print_kv(
                    "allocation.horizon_days",
                    &config.allocation.horizon_days.to_string(),
                );
                output::print_kv(
                    "allocation.seed_default_rooms",
                    &config.allocation.seed_default_rooms.to_string(),
                );
                output::print_kv("logging.level", &config.logging.level);
                output::print_kv("logging.format", &config.logging.format);
            }
        },
    }

    Ok(())
}
