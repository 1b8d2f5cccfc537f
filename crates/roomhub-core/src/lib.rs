//! # roomhub-core
//!
//! Core crate for RoomHub. Contains the unified error system, configuration
//! schemas, typed identifiers, and the persistence trait implemented by
//! `roomhub-storage`.
//!
//! This crate has **no** internal dependencies on other RoomHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorDetail, ErrorKind};
pub use result::AppResult;
