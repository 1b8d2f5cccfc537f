//! Room inventory CLI commands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use roomhub_core::config::AppConfig;
use roomhub_core::error::AppError;
use roomhub_core::types::id::RoomId;
use roomhub_entity::room::{NewRoom, Room, RoomStatus, RoomType, RoomUpdate};
use roomhub_service::RoomFilter;

use super::class::ClassRow;
use crate::output::{self, OutputFormat};

/// Arguments for room commands
#[derive(Debug, Args)]
pub struct RoomArgs {
    /// Room subcommand
    #[command(subcommand)]
    pub command: RoomCommand,
}

/// Room subcommands
#[derive(Debug, Subcommand)]
pub enum RoomCommand {
    /// List rooms, available first
    List {
        /// Filter by room type
        #[arg(long = "type")]
        room_type: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<RoomStatus>,
        /// Minimum capacity
        #[arg(long)]
        min_capacity: Option<u32>,
        /// Group the listing by status
        #[arg(long)]
        grouped: bool,
    },
    /// Show one room and the classes booked into it
    Show {
        /// Room id
        id: RoomId,
    },
    /// Add a room
    Add {
        /// Room id, e.g. `room-21`
        id: RoomId,
        /// Display name
        #[arg(long)]
        name: String,
        /// Room type, e.g. `standard`
        #[arg(long = "type")]
        room_type: String,
        /// Seats
        #[arg(long)]
        capacity: u32,
    },
    /// Change a room's name, type, or capacity
    Update {
        /// Room id
        id: RoomId,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New room type
        #[arg(long = "type")]
        room_type: Option<String>,
        /// New capacity
        #[arg(long)]
        capacity: Option<u32>,
    },
    /// Take a room out of service
    Block {
        /// Room id
        id: RoomId,
    },
    /// Return a room to service
    Unblock {
        /// Room id
        id: RoomId,
    },
    /// Close a room on single dates
    BlockDates {
        /// Room id
        id: RoomId,
        /// Dates as YYYY-MM-DD
        #[arg(required = true)]
        dates: Vec<NaiveDate>,
    },
    /// Reopen a room on single dates
    UnblockDates {
        /// Room id
        id: RoomId,
        /// Dates as YYYY-MM-DD
        #[arg(required = true)]
        dates: Vec<NaiveDate>,
    },
    /// Delete a room no class references
    Remove {
        /// Room id
        id: RoomId,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Room display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct RoomRow {
    /// Room ID
    id: String,
    /// Name
    name: String,
    /// Type
    #[tabled(rename = "type")]
    room_type: String,
    /// Capacity
    capacity: u32,
    /// Status
    status: String,
    /// Closed dates
    closed: String,
}

impl From<&Room> for RoomRow {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name.clone(),
            room_type: room.room_type.to_string(),
            capacity: room.capacity,
            status: room.status.to_string(),
            closed: room
                .blocked_dates
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Execute room commands
pub async fn execute(
    args: &RoomArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let scheduler = super::open_scheduler(config).await?;

    match &args.command {
        RoomCommand::List {
            room_type,
            status,
            min_capacity,
            grouped,
        } => {
            let filter = RoomFilter {
                room_type: room_type.as_deref().map(RoomType::new),
                status: *status,
                min_capacity: *min_capacity,
            };
            if *grouped {
                let groups = scheduler.rooms_grouped(&filter).await;
                match format {
                    OutputFormat::Json => output::print_json(&groups, "{}"),
                    OutputFormat::Table => {
                        for (status, rooms) in &groups {
                            println!("{status} ({})", rooms.len());
                            let rows: Vec<RoomRow> = rooms.iter().map(RoomRow::from).collect();
                            output::print_list(&rows, format);
                            println!();
                        }
                    }
                }
            } else {
                let rows: Vec<RoomRow> = scheduler
                    .rooms(&filter)
                    .await
                    .iter()
                    .map(RoomRow::from)
                    .collect();
                output::print_list(&rows, format);
            }
        }
        RoomCommand::Show { id } => {
            let room = scheduler.room(id).await?;
            let classes = scheduler.classes_in(id).await?;
            match format {
                OutputFormat::Json => output::print_json(
                    &serde_json::json!({ "room": room, "classes": classes }),
                    "{}",
                ),
                OutputFormat::Table => {
                    print_room(&room);
                    println!();
                    let rows: Vec<ClassRow> = classes.iter().map(ClassRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        RoomCommand::Add {
            id,
            name,
            room_type,
            capacity,
        } => {
            let room = scheduler
                .register_room(NewRoom {
                    id: id.clone(),
                    name: name.clone(),
                    room_type: RoomType::new(room_type),
                    capacity: *capacity,
                })
                .await?;
            report(&room, &format!("Room '{}' added", room.id), format);
        }
        RoomCommand::Update {
            id,
            name,
            room_type,
            capacity,
        } => {
            let update = RoomUpdate {
                name: name.clone(),
                room_type: room_type.as_deref().map(RoomType::new),
                capacity: *capacity,
            };
            let room = scheduler.update_room(id, update).await?;
            report(&room, &format!("Room '{}' updated", room.id), format);
        }
        RoomCommand::Block { id } => {
            let room = scheduler.block_room(id).await?;
            report(&room, &format!("Room '{}' blocked", room.id), format);
        }
        RoomCommand::Unblock { id } => {
            let room = scheduler.unblock_room(id).await?;
            report(
                &room,
                &format!("Room '{}' unblocked ({})", room.id, room.status),
                format,
            );
        }
        RoomCommand::BlockDates { id, dates } => {
            let room = scheduler.block_dates(id, &super::date_set(dates)?).await?;
            report(
                &room,
                &format!("Room '{}' closed on {} date(s)", room.id, dates.len()),
                format,
            );
        }
        RoomCommand::UnblockDates { id, dates } => {
            let room = scheduler.unblock_dates(id, &super::date_set(dates)?).await?;
            report(
                &room,
                &format!("Room '{}' reopened on {} date(s)", room.id, dates.len()),
                format,
            );
        }
        RoomCommand::Remove { id, force } => {
            if !super::confirm(&format!("Remove room '{id}'?"), *force)? {
                output::print_warning("Aborted");
                return Ok(());
            }
            let room = scheduler.remove_room(id).await?;
            report(&room, &format!("Room '{}' removed", room.id), format);
        }
    }

    Ok(())
}

fn report(room: &Room, message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(room, "{}"),
        OutputFormat::Table => output::print_success(message),
    }
}

fn print_room(room: &Room) {
    output::print_kv("Room", room.id.as_str());
    output::print_kv("Name", &room.name);
    output::print_kv("Type", room.room_type.as_str());
    output::print_kv("Capacity", &room.capacity.to_string());
    output::print_kv("Status", room.status.as_str());
    if !room.blocked_dates.is_empty() {
        let dates: Vec<String> = room.blocked_dates.iter().map(|d| d.to_string()).collect();
        output::print_kv("Closed on", &dates.join(", "));
    }
}
