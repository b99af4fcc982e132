//! Error types for appointment-engine operations.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::conflict::ConflictSummary;
use crate::model::{AppointmentId, ContactId, CustomerId, DivisionId, UserId};

/// Why a proposed appointment could not be saved.
///
/// The first four variants are the scheduling taxonomy the presentation layer
/// renders differently: bad chronology, outside business hours, overlapping
/// appointments, and an unreachable store.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Start {start} must be before end {end}")]
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Outside of business hours: {start} - {end} must fall within one shift ({window})")]
    OutsideBusinessHours {
        start: NaiveDateTime,
        end: NaiveDateTime,
        /// The shift window rendered for the viewer.
        window: String,
    },

    /// Every overlapping appointment, not just the first one found.
    #[error(
        "Scheduling overlap with {} appointment(s):{}",
        .conflicts.len(),
        render_conflicts(.conflicts)
    )]
    Conflict { conflicts: Vec<ConflictSummary> },

    #[error("Appointment store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Unknown appointment: {0}")]
    UnknownAppointment(AppointmentId),

    #[error("Unknown customer: {0}")]
    UnknownCustomer(CustomerId),

    #[error("Unknown contact: {0}")]
    UnknownContact(ContactId),

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Unknown division: {0}")]
    UnknownDivision(DivisionId),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl ScheduleError {
    /// True when the user can fix the failure by editing the form.
    ///
    /// A store failure is the only case where the input itself may be fine
    /// and retrying later is the right advice.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ScheduleError::StoreUnavailable(_))
    }
}

fn render_conflicts(conflicts: &[ConflictSummary]) -> String {
    conflicts.iter().map(|c| format!("\n  {}", c)).collect()
}

/// Failures of the backing appointment store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

/// Invalid business-hours configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid opening time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid value for {var}: '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
