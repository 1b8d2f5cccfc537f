//! Occupancy dashboard CLI command.

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use roomhub_core::config::AppConfig;
use roomhub_core::error::AppError;
use roomhub_service::OccupancySnapshot;

use crate::output::{self, OutputFormat};

/// Arguments for the dashboard command
#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Date to report on, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// One period of the dashboard
#[derive(Debug, Serialize, Tabled)]
struct PeriodRow {
    /// Period
    period: String,
    /// Occupied rooms
    occupied: u32,
    /// Reserved rooms
    reserved: u32,
    /// Available rooms
    available: u32,
    /// Blocked rooms
    blocked: u32,
}

/// Execute the dashboard command
pub async fn execute(
    args: &DashboardArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let scheduler = super::open_scheduler(config).await?;
    let snapshot = match args.date {
        Some(date) => scheduler.dashboard_on(date).await?,
        None => scheduler.dashboard().await?,
    };

    match format {
        OutputFormat::Json => output::print_json(&snapshot, "{}"),
        OutputFormat::Table => {
            output::print_kv("Date", &snapshot.date.to_string());
            output::print_kv("Rooms", &snapshot.total_rooms.to_string());
            println!();
            output::print_list(&rows(&snapshot), format);
        }
    }
    Ok(())
}

fn rows(snapshot: &OccupancySnapshot) -> Vec<PeriodRow> {
    snapshot
        .periods
        .iter()
        .map(|(period, counts)| PeriodRow {
            period: period.label(),
            occupied: counts.occupied,
            reserved: counts.reserved,
            available: counts.available,
            blocked: counts.blocked,
        })
        .collect()
}
