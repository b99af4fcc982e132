//! Data behind the report screens: bookings by type and month, each
//! contact's schedule, and bookings per division. Also the dashboard's
//! next-week and next-month views.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::directory::Directory;
use crate::error::StoreError;
use crate::model::{Appointment, ContactId};
use crate::store::AppointmentStore;

/// Appointment counts for one type, January through December.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMonthCounts {
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub months: [u32; 12],
}

impl TypeMonthCounts {
    pub fn total(&self) -> u32 {
        self.months.iter().sum()
    }
}

/// Count appointments per type per start month, across all years. Sorted by
/// type.
pub fn monthly_type_counts(appointments: &[Appointment]) -> Vec<TypeMonthCounts> {
    let mut by_type: BTreeMap<&str, [u32; 12]> = BTreeMap::new();
    for appointment in appointments {
        let months = by_type
            .entry(appointment.appointment_type.as_str())
            .or_insert([0; 12]);
        // month0() is always 0..=11
        if let Some(count) = months.get_mut(appointment.start.month0() as usize) {
            *count += 1;
        }
    }
    by_type
        .into_iter()
        .map(|(appointment_type, months)| TypeMonthCounts {
            appointment_type: appointment_type.to_string(),
            months,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSchedule {
    pub contact_id: ContactId,
    pub contact_name: String,
    pub appointments: Vec<Appointment>,
}

/// Every contact's appointments ordered by start, contacts in id order.
/// Contacts with nothing booked are included with an empty list.
pub fn contact_schedules<S: AppointmentStore + ?Sized>(
    directory: &Directory,
    store: &S,
) -> Result<Vec<ContactSchedule>, StoreError> {
    directory
        .contacts()
        .map(|contact| -> Result<ContactSchedule, StoreError> {
            Ok(ContactSchedule {
                contact_id: contact.id,
                contact_name: contact.name.clone(),
                appointments: store.list_by_contact(contact.id)?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionBookings {
    pub division: String,
    pub bookings: usize,
}

/// Appointments per first-level division of the booking customer, most
/// booked first. Appointments whose customer or division is unknown are
/// skipped.
pub fn division_bookings(
    directory: &Directory,
    appointments: &[Appointment],
) -> Vec<DivisionBookings> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for appointment in appointments {
        let division = directory
            .customer(appointment.customer_id)
            .and_then(|c| directory.division(c.division_id));
        if let Some(division) = division {
            *counts.entry(division.name.as_str()).or_default() += 1;
        }
    }
    let mut rows: Vec<DivisionBookings> = counts
        .into_iter()
        .map(|(division, bookings)| DivisionBookings {
            division: division.to_string(),
            bookings,
        })
        .collect();
    // Stable: ties stay in name order.
    rows.sort_by(|a, b| b.bookings.cmp(&a.bookings));
    rows
}

/// Look-ahead window for the dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
}

impl Period {
    /// End of the window starting at `from`.
    pub fn end_from(self, from: NaiveDateTime) -> NaiveDateTime {
        match self {
            Period::Week => from + Duration::days(7),
            Period::Month => from
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDateTime::MAX),
        }
    }
}

/// Appointments starting within `period` of `now`, ordered by start.
pub fn upcoming(
    appointments: &[Appointment],
    now: NaiveDateTime,
    period: Period,
) -> Vec<Appointment> {
    let until = period.end_from(now);
    let mut found: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.start >= now && a.start <= until)
        .cloned()
        .collect();
    found.sort_by_key(|a| (a.start, a.id));
    found
}
