//! # roomhub-cli
//!
//! Administrative command tree for RoomHub: room inventory, class
//! allocation, reservations, the occupancy dashboard, and configuration
//! inspection. The `roomhub` binary parses [`Cli`] and hands it a loaded
//! configuration.

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands};
pub use output::OutputFormat;
