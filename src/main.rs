//! RoomHub: classroom allocation engine
//!
//! Main entry point: parses the command line, loads configuration,
//! initializes logging, and dispatches to the CLI command tree.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use roomhub_cli::Cli;
use roomhub_core::config::AppConfig;
use roomhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(kind = %e.kind, "Command failed: {}", e.message);
        eprintln!("✗ {}", e);
        if let Some(detail) = &e.detail {
            if let Ok(json) = serde_json::to_string_pretty(detail) {
                eprintln!("{json}");
            }
        }
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("ROOMHUB_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let env = cli
        .env
        .clone()
        .or_else(|| std::env::var("ROOMHUB_ENV").ok())
        .unwrap_or_else(|| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
///
/// Logs go to stderr so table and JSON output on stdout stay clean.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Run the selected command
async fn run(cli: &Cli, config: &AppConfig) -> Result<(), AppError> {
    tracing::debug!(
        backend = %config.storage.backend,
        path = %config.storage.path,
        "Starting RoomHub v{}",
        env!("CARGO_PKG_VERSION")
    );
    cli.execute(config).await
}
