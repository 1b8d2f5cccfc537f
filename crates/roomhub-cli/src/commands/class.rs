//! Class allocation and scheduling CLI commands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use roomhub_core::config::AppConfig;
use roomhub_core::error::AppError;
use roomhub_core::types::id::{ClassId, RoomId};
use roomhub_entity::class::{
    ClassSchedule, ClassSession, ClassUpdate, DayOfWeek, NewClassSession, Period,
};
use roomhub_entity::room::{Room, RoomType};
use roomhub_service::{AllocationOutcome, Proposal, Scheduler};

use crate::output::{self, OutputFormat};

/// Arguments for class commands
#[derive(Debug, Args)]
pub struct ClassArgs {
    /// Class subcommand
    #[command(subcommand)]
    pub command: ClassCommand,
}

/// Schedule flags shared by `allocate` and `reschedule`
#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    /// Weekdays, comma separated (e.g. `mon,wed`)
    #[arg(long, value_delimiter = ',')]
    pub days: Vec<DayOfWeek>,
    /// `morning`, `afternoon`, `evening`, or `HH:MM-HH:MM`
    #[arg(long)]
    pub period: Option<Period>,
    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last day, YYYY-MM-DD; omit for an open-ended class
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

/// Class subcommands
#[derive(Debug, Subcommand)]
pub enum ClassCommand {
    /// List classes, oldest first
    List {
        /// Only classes in this room
        #[arg(long)]
        room: Option<RoomId>,
    },
    /// Show one class
    Show {
        /// Class id
        id: ClassId,
    },
    /// Book a class, or suggest a room or later start when the request cannot be met
    Allocate {
        /// Class name
        #[arg(long)]
        name: String,
        /// Number of students
        #[arg(long)]
        students: u32,
        /// Required room type
        #[arg(long = "type")]
        room_type: Option<String>,
        /// Requested room
        #[arg(long)]
        room: Option<RoomId>,
        /// Schedule
        #[command(flatten)]
        schedule: ScheduleArgs,
        /// Book a suggestion without asking
        #[arg(long)]
        accept: bool,
    },
    /// Book a proposal saved from `class allocate --format json`
    Confirm {
        /// Path to the proposal JSON
        #[arg(long)]
        proposal: String,
    },
    /// Hold a room for a class pending confirmation
    Reserve {
        /// Class id
        id: ClassId,
        /// Room to hold
        room: RoomId,
    },
    /// Reserve a room, moving clashing classes to other rooms
    ReserveDisplacing {
        /// Class id
        id: ClassId,
        /// Room to hold
        room: RoomId,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Confirm a pending reservation
    ConfirmReservation {
        /// Class id
        id: ClassId,
    },
    /// Move a class to another room
    Swap {
        /// Class id
        id: ClassId,
        /// Destination room
        room: RoomId,
    },
    /// Free a single occurrence of a class
    Release {
        /// Class id
        id: ClassId,
        /// Date to free, YYYY-MM-DD
        date: NaiveDate,
        /// Why the occurrence is freed
        #[arg(long)]
        reason: Option<String>,
    },
    /// Change a class's name, size, schedule, or room
    Reschedule {
        /// Class id
        id: ClassId,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New number of students
        #[arg(long)]
        students: Option<u32>,
        /// New room
        #[arg(long)]
        room: Option<RoomId>,
        /// Schedule fields to replace
        #[command(flatten)]
        schedule: ScheduleArgs,
        /// Drop the end date
        #[arg(long, conflicts_with = "end")]
        open_ended: bool,
    },
    /// Delete a class
    Delete {
        /// Class id
        id: ClassId,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Class display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct ClassRow {
    /// Class ID
    id: String,
    /// Name
    name: String,
    /// Room
    room: String,
    /// Students
    students: u32,
    /// Days
    days: String,
    /// Period
    period: String,
    /// Date range
    dates: String,
    /// Booking state
    booking: String,
    /// Released occurrences
    released: usize,
}

impl From<&ClassSession> for ClassRow {
    fn from(class: &ClassSession) -> Self {
        Self {
            id: class.id.to_string(),
            name: class.name.clone(),
            room: class
                .room_id
                .as_ref()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".into()),
            students: class.student_count,
            days: days_label(&class.schedule),
            period: class.schedule.period.label(),
            dates: dates_label(&class.schedule),
            booking: class.booking.to_string(),
            released: class.released.len(),
        }
    }
}

/// Execute class commands
pub async fn execute(
    args: &ClassArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let scheduler = super::open_scheduler(config).await?;

    match &args.command {
        ClassCommand::List { room } => {
            let classes = match room {
                Some(room) => scheduler.classes_in(room).await?,
                None => scheduler.classes().await,
            };
            let rows: Vec<ClassRow> = classes.iter().map(ClassRow::from).collect();
            output::print_list(&rows, format);
        }
        ClassCommand::Show { id } => {
            let class = scheduler.class(*id).await?;
            match format {
                OutputFormat::Json => output::print_json(&class, "{}"),
                OutputFormat::Table => print_class(&class),
            }
        }
        ClassCommand::Allocate {
            name,
            students,
            room_type,
            room,
            schedule,
            accept,
        } => {
            let request = NewClassSession {
                name: name.clone(),
                student_count: *students,
                room_type: room_type.as_deref().map(RoomType::new),
                schedule: new_schedule(schedule)?,
                room_id: room.clone(),
            };
            allocate(&scheduler, request, *accept, format).await?;
        }
        ClassCommand::Confirm { proposal } => {
            let proposal = read_proposal(proposal).await?;
            let (class, room) = scheduler.confirm(proposal).await?;
            report_booking(&class, &room, format);
        }
        ClassCommand::Reserve { id, room } => {
            let room = scheduler.reserve(*id, room).await?;
            report_room(&room, &format!("Room '{}' reserved for class {id}", room.id), format);
        }
        ClassCommand::ReserveDisplacing { id, room, force } => {
            let prompt = format!("Reserve room '{room}' and move its clashing classes?");
            if !super::confirm(&prompt, *force)? {
                output::print_warning("Aborted");
                return Ok(());
            }
            let displacement = scheduler.reserve_displacing(*id, room).await?;
            match format {
                OutputFormat::Json => output::print_json(&displacement, "{}"),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Room '{}' reserved for class {id}",
                        displacement.room.id
                    ));
                    for moved in &displacement.moved {
                        output::print_kv(
                            &moved.class_id.short(),
                            &format!("moved {} → {}", moved.from, moved.to),
                        );
                    }
                }
            }
        }
        ClassCommand::ConfirmReservation { id } => {
            let room = scheduler.confirm_reservation(*id).await?;
            report_room(
                &room,
                &format!("Reservation of room '{}' confirmed", room.id),
                format,
            );
        }
        ClassCommand::Swap { id, room } => {
            let (old, new) = scheduler.swap(*id, room).await?;
            match format {
                OutputFormat::Json => {
                    output::print_json(&serde_json::json!({ "from": old, "to": new }), "{}")
                }
                OutputFormat::Table => {
                    let from = old.map(|r| r.id.to_string()).unwrap_or_else(|| "-".into());
                    output::print_success(&format!("Class {id} moved {from} → {}", new.id));
                }
            }
        }
        ClassCommand::Release { id, date, reason } => {
            let class = scheduler.release(*id, *date, reason.clone()).await?;
            report_class(&class, &format!("Released {date} for '{}'", class.name), format);
        }
        ClassCommand::Reschedule {
            id,
            name,
            students,
            room,
            schedule,
            open_ended,
        } => {
            let current = scheduler.class(*id).await?;
            let update = ClassUpdate {
                name: name.clone(),
                schedule: updated_schedule(&current.schedule, schedule, *open_ended),
                student_count: *students,
                room_id: room.clone(),
            };
            let class = scheduler.reschedule(*id, update).await?;
            report_class(&class, &format!("Class '{}' updated", class.name), format);
        }
        ClassCommand::Delete { id, force } => {
            let class = scheduler.class(*id).await?;
            if !super::confirm(&format!("Delete class '{}'?", class.name), *force)? {
                output::print_warning("Aborted");
                return Ok(());
            }
            let class = scheduler.delete(*id).await?;
            report_class(&class, &format!("Class '{}' deleted", class.name), format);
        }
    }

    Ok(())
}

async fn allocate(
    scheduler: &Scheduler,
    request: NewClassSession,
    accept: bool,
    format: OutputFormat,
) -> Result<(), AppError> {
    match scheduler.allocate(request).await? {
        AllocationOutcome::Booked { class, room } => report_booking(&class, &room, format),
        AllocationOutcome::Suggested { proposal } => {
            let take = match format {
                OutputFormat::Json if !accept => {
                    output::print_json(&AllocationOutcome::Suggested { proposal }, "{}");
                    return Ok(());
                }
                OutputFormat::Json => true,
                OutputFormat::Table => {
                    print_proposal(&proposal);
                    super::confirm("Book this suggestion?", accept)?
                }
            };
            if !take {
                output::print_warning("Nothing booked");
                return Ok(());
            }
            let (class, room) = scheduler.confirm(proposal).await?;
            report_booking(&class, &room, format);
        }
    }
    Ok(())
}

/// Accepts either a bare proposal or the `allocate` JSON output wrapping one.
async fn read_proposal(path: &str) -> Result<Proposal, AppError> {
    let data = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::validation(format!("Failed to read proposal '{path}': {e}"))
    })?;
    let mut value: serde_json::Value = serde_json::from_str(&data)?;
    if let Some(inner) = value.get_mut("proposal") {
        value = inner.take();
    }
    Ok(serde_json::from_value(value)?)
}

fn new_schedule(args: &ScheduleArgs) -> Result<ClassSchedule, AppError> {
    let start_date = args
        .start
        .ok_or_else(|| AppError::validation("--start is required"))?;
    let period = args
        .period
        .ok_or_else(|| AppError::validation("--period is required"))?;
    Ok(ClassSchedule {
        days: args.days.iter().copied().collect(),
        period,
        start_date,
        end_date: args.end,
    })
}

/// Overlay the given flags on `current`; `None` when nothing changes.
fn updated_schedule(
    current: &ClassSchedule,
    args: &ScheduleArgs,
    open_ended: bool,
) -> Option<ClassSchedule> {
    let untouched = args.days.is_empty()
        && args.period.is_none()
        && args.start.is_none()
        && args.end.is_none()
        && !open_ended;
    if untouched {
        return None;
    }
    let mut schedule = current.clone();
    if !args.days.is_empty() {
        schedule.days = args.days.iter().copied().collect();
    }
    if let Some(period) = args.period {
        schedule.period = period;
    }
    if let Some(start) = args.start {
        schedule.start_date = start;
    }
    if args.end.is_some() || open_ended {
        schedule.end_date = args.end;
    }
    Some(schedule)
}

fn days_label(schedule: &ClassSchedule) -> String {
    schedule
        .days
        .iter()
        .map(|d| &d.as_str()[..3])
        .collect::<Vec<_>>()
        .join(",")
}

fn dates_label(schedule: &ClassSchedule) -> String {
    match schedule.end_date {
        Some(end) => format!("{} … {end}", schedule.start_date),
        None => format!("{} …", schedule.start_date),
    }
}

fn report_booking(class: &ClassSession, room: &Room, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(
            &serde_json::json!({ "class": class, "room": room }),
            "{}",
        ),
        OutputFormat::Table => {
            output::print_success(&format!(
                "Class '{}' booked in room '{}'",
                class.name, room.id
            ));
            output::print_kv("Class ID", &class.id.to_string());
            output::print_kv("Starts", &class.schedule.start_date.to_string());
        }
    }
}

fn report_room(room: &Room, message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(room, "{}"),
        OutputFormat::Table => output::print_success(message),
    }
}

fn report_class(class: &ClassSession, message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(class, "{}"),
        OutputFormat::Table => output::print_success(message),
    }
}

fn print_proposal(proposal: &Proposal) {
    output::print_warning(&format!(
        "'{}' cannot be booked as requested",
        proposal.request.name
    ));
    output::print_kv("Suggestion", &proposal.reason.to_string());
    output::print_kv("Room", proposal.room_id.as_str());
    output::print_kv("Dates", &dates_label(&proposal.schedule));
    if !proposal.blocked_by.is_empty() {
        let ids: Vec<String> = proposal.blocked_by.iter().map(|id| id.short()).collect();
        output::print_kv("Conflicts with", &ids.join(", "));
    }
}

fn print_class(class: &ClassSession) {
    output::print_kv("Class", &class.id.to_string());
    output::print_kv("Name", &class.name);
    output::print_kv(
        "Room",
        class.room_id.as_ref().map(|r| r.as_str()).unwrap_or("-"),
    );
    output::print_kv("Students", &class.student_count.to_string());
    if let Some(room_type) = &class.room_type {
        output::print_kv("Room type", room_type.as_str());
    }
    output::print_kv("Days", &days_label(&class.schedule));
    output::print_kv("Period", &class.schedule.period.label());
    output::print_kv("Dates", &dates_label(&class.schedule));
    output::print_kv("Booking", class.booking.as_str());
    for slot in &class.released {
        output::print_kv(
            "Released",
            &match &slot.reason {
                Some(reason) => format!("{} ({reason})", slot.date),
                None => slot.date.to_string(),
            },
        );
    }
}
