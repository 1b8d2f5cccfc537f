//! Unified application error types for RoomHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Business outcomes such as a booking
//! conflict or an exhausted search are ordinary error kinds, so callers can
//! branch on [`AppError::kind`] instead of parsing messages.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::{ClassId, RoomId};

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unknown room or class identifier.
    NotFound,
    /// Registering an identifier that already exists.
    DuplicateIdentity,
    /// The requested booking overlaps an existing one.
    Conflict,
    /// The target room is blocked or does not meet capacity/type requirements.
    RoomUnavailable,
    /// Malformed weekday set, inverted date range, or invalid period.
    InvalidSchedule,
    /// Release date outside the active range, off-pattern, or already released.
    InvalidDate,
    /// The allocation search exhausted its horizon.
    NoAvailability,
    /// The persistence backend could not durably record a valid mutation.
    StorageFailure,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::DuplicateIdentity => write!(f, "DUPLICATE_IDENTITY"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::RoomUnavailable => write!(f, "ROOM_UNAVAILABLE"),
            Self::InvalidSchedule => write!(f, "INVALID_SCHEDULE"),
            Self::InvalidDate => write!(f, "INVALID_DATE"),
            Self::NoAvailability => write!(f, "NO_AVAILABILITY"),
            Self::StorageFailure => write!(f, "STORAGE_FAILURE"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Structured payload attached to business errors.
///
/// Lets a caller render "conflicts with class X" or "next window:
/// 2025-03-10" without re-running the search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Sessions whose bookings clash with the request, in creation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_classes: Vec<ClassId>,
    /// Rooms involved in the failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rooms: Vec<RoomId>,
    /// First date on which the clash happens, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_date: Option<NaiveDate>,
    /// Suggested next free start date, if one was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_window: Option<NaiveDate>,
}

impl ErrorDetail {
    /// Whether the detail carries no information.
    pub fn is_empty(&self) -> bool {
        self.conflicting_classes.is_empty()
            && self.rooms.is_empty()
            && self.conflict_date.is_none()
            && self.next_window.is_none()
    }
}

/// The unified application error used throughout RoomHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Conflicting sessions, rooms, and suggestions, where applicable.
    pub detail: Option<ErrorDetail>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach a structured detail payload.
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        if !detail.is_empty() {
            self.detail = Some(detail);
        }
        self
    }

    /// Return the attached detail, or an empty one.
    pub fn detail(&self) -> ErrorDetail {
        self.detail.clone().unwrap_or_default()
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a duplicate-identity error.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateIdentity, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a room-unavailable error.
    pub fn room_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RoomUnavailable, message)
    }

    /// Create an invalid-schedule error.
    pub fn invalid_schedule(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSchedule, message)
    }

    /// Create an invalid-date error.
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDate, message)
    }

    /// Create a no-availability error.
    pub fn no_availability(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoAvailability, message)
    }

    /// Create a storage failure error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageFailure, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            detail: self.detail.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::StorageFailure, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::with_source(ErrorKind::Validation, format!("Invalid input: {err}"), err)
    }
}
