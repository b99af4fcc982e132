//! Detect stored appointments that collide with a proposed interval.
//!
//! Uses the inclusive rule from [`crate::interval::touches`]: back-to-back
//! appointments (one ends exactly when the other starts) ARE conflicts.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::interval::touches;
use crate::model::{Appointment, AppointmentId, CustomerId};
use crate::store::AppointmentStore;

/// Enough of a conflicting appointment to explain the clash to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSummary {
    pub id: AppointmentId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub customer_id: CustomerId,
}

impl From<&Appointment> for ConflictSummary {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id,
            title: appointment.title.clone(),
            start: appointment.start,
            end: appointment.end,
            customer_id: appointment.customer_id,
        }
    }
}

impl fmt::Display for ConflictSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Appt ID: {} \"{}\" Customer: {} Start: {} End: {}",
            self.id,
            self.title,
            self.customer_id,
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Scan a list of appointments for ones touching `[start, end]`, skipping
/// `exclude`.
pub fn overlapping<'a>(
    appointments: &'a [Appointment],
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude: Option<AppointmentId>,
) -> impl Iterator<Item = &'a Appointment> + 'a {
    appointments.iter().filter(move |a| {
        Some(a.id) != exclude && touches(a.start, a.end, start, end)
    })
}

/// Ask the store for every appointment touching `[start, end]` other than
/// `exclude`, ordered by start.
///
/// Read-only. A store failure is returned as-is and must never be read as
/// "no conflicts".
pub fn find_conflicts<S: AppointmentStore + ?Sized>(
    store: &S,
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude: Option<AppointmentId>,
) -> Result<Vec<ConflictSummary>, StoreError> {
    let mut found = store.find_overlapping(start, end, exclude)?;
    found.sort_by_key(|a| (a.start, a.id));
    debug!(%start, %end, ?exclude, conflicts = found.len(), "conflict lookup");
    Ok(found.iter().map(ConflictSummary::from).collect())
}
