//! Plain records for the scheduling schema.
//!
//! Every record is referenced by a typed id. Times are naive date-times in the
//! viewer's local zone, the same way the store keeps them.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Store-assigned appointment identifier.
    AppointmentId
);
record_id!(CustomerId);
record_id!(ContactId);
record_id!(UserId);
record_id!(CountryId);
record_id!(
    /// First-level division (state, province, region).
    DivisionId
);

/// A persisted appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub customer_id: CustomerId,
    pub contact_id: ContactId,
    /// Denormalized from the contacts table for display.
    pub contact_name: String,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Appointment {
    /// Strip the id, e.g. to re-run field checks on an edited record.
    pub fn into_draft(self) -> AppointmentDraft {
        AppointmentDraft {
            customer_id: self.customer_id,
            contact_id: self.contact_id,
            contact_name: self.contact_name,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            appointment_type: self.appointment_type,
            location: self.location,
            start: self.start,
            end: self.end,
        }
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Appt ID: {} Customer: {} Type: {} Start: {} End: {}",
            self.id, self.customer_id, self.appointment_type, self.start, self.end
        )
    }
}

/// An appointment that has not been stored yet and so has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub customer_id: CustomerId,
    pub contact_id: ContactId,
    pub contact_name: String,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl AppointmentDraft {
    /// Trim every free-text field and reject blank ones.
    pub fn normalized(self) -> Result<Self, ScheduleError> {
        Ok(Self {
            contact_name: required("contact name", self.contact_name)?,
            title: required("title", self.title)?,
            description: required("description", self.description)?,
            appointment_type: required("type", self.appointment_type)?,
            location: required("location", self.location)?,
            ..self
        })
    }

    pub fn with_id(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            customer_id: self.customer_id,
            contact_id: self.contact_id,
            contact_name: self.contact_name,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            appointment_type: self.appointment_type,
            location: self.location,
            start: self.start,
            end: self.end,
        }
    }
}

fn required(field: &'static str, value: String) -> Result<String, ScheduleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    pub division_id: DivisionId,
}

impl Customer {
    pub fn into_draft(self) -> CustomerDraft {
        CustomerDraft {
            name: self.name,
            address: self.address,
            postal_code: self.postal_code,
            phone: self.phone,
            division_id: self.division_id,
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer ID: {} Name: {}", self.id, self.name)
    }
}

/// A customer record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    pub division_id: DivisionId,
}

impl CustomerDraft {
    /// Trim every text field and reject blank ones.
    pub fn normalized(self) -> Result<Self, ScheduleError> {
        Ok(Self {
            name: required("name", self.name)?,
            address: required("address", self.address)?,
            postal_code: required("postal code", self.postal_code)?,
            phone: required("phone", self.phone)?,
            ..self
        })
    }

    pub fn with_id(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            address: self.address,
            postal_code: self.postal_code,
            phone: self.phone,
            division_id: self.division_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
    pub country_id: CountryId,
}
