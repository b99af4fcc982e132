//! Appointment Store contract and an in-memory implementation.
//!
//! Stores are plain values handed to whoever needs them; there is no global
//! connection. See [`crate::file_store`] for the JSON-file backed store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::conflict::overlapping;
use crate::error::StoreError;
use crate::model::{
    Appointment, AppointmentDraft, AppointmentId, Contact, ContactId, Country, Customer,
    CustomerDraft, CustomerId, Division, User,
};

/// Persistence and queries for appointments.
pub trait AppointmentStore {
    fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError>;

    fn list(&self) -> Result<Vec<Appointment>, StoreError>;

    fn list_by_customer(&self, customer: CustomerId) -> Result<Vec<Appointment>, StoreError>;

    /// A contact's appointments, ordered by start.
    fn list_by_contact(&self, contact: ContactId) -> Result<Vec<Appointment>, StoreError>;

    /// Appointments touching `[start, end]`, other than `exclude`.
    fn find_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<AppointmentId>,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// Persist a draft and return it with its new id.
    fn insert(&mut self, draft: AppointmentDraft) -> Result<Appointment, StoreError>;

    /// Overwrite an existing appointment. `NotFound` if the id is unknown.
    fn update(&mut self, appointment: &Appointment) -> Result<(), StoreError>;

    /// Remove one appointment, returning it if it existed.
    fn delete(&mut self, id: AppointmentId) -> Result<Option<Appointment>, StoreError>;

    /// Remove every appointment for a customer, returning how many went.
    fn delete_by_customer(&mut self, customer: CustomerId) -> Result<usize, StoreError>;
}

/// Reference tables read when a screen loads, plus customer maintenance.
pub trait DirectoryStore {
    fn users(&self) -> Result<Vec<User>, StoreError>;

    fn customers(&self) -> Result<Vec<Customer>, StoreError>;

    fn contacts(&self) -> Result<Vec<Contact>, StoreError>;

    fn countries(&self) -> Result<Vec<Country>, StoreError>;

    fn divisions(&self) -> Result<Vec<Division>, StoreError>;

    /// Persist a new customer and return it with its new id.
    fn insert_customer(&mut self, draft: CustomerDraft) -> Result<Customer, StoreError>;

    /// Overwrite an existing customer. `NotFound` if the id is unknown.
    fn update_customer(&mut self, customer: &Customer) -> Result<(), StoreError>;

    /// Remove a customer record, returning whether it existed.
    fn delete_customer(&mut self, id: CustomerId) -> Result<bool, StoreError>;
}

impl<T: AppointmentStore + ?Sized> AppointmentStore for &mut T {
    fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        (**self).list()
    }

    fn list_by_customer(&self, customer: CustomerId) -> Result<Vec<Appointment>, StoreError> {
        (**self).list_by_customer(customer)
    }

    fn list_by_contact(&self, contact: ContactId) -> Result<Vec<Appointment>, StoreError> {
        (**self).list_by_contact(contact)
    }

    fn find_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<AppointmentId>,
    ) -> Result<Vec<Appointment>, StoreError> {
        (**self).find_overlapping(start, end, exclude)
    }

    fn insert(&mut self, draft: AppointmentDraft) -> Result<Appointment, StoreError> {
        (**self).insert(draft)
    }

    fn update(&mut self, appointment: &Appointment) -> Result<(), StoreError> {
        (**self).update(appointment)
    }

    fn delete(&mut self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        (**self).delete(id)
    }

    fn delete_by_customer(&mut self, customer: CustomerId) -> Result<usize, StoreError> {
        (**self).delete_by_customer(customer)
    }
}

impl<T: DirectoryStore + ?Sized> DirectoryStore for &mut T {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        (**self).users()
    }

    fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        (**self).customers()
    }

    fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
        (**self).contacts()
    }

    fn countries(&self) -> Result<Vec<Country>, StoreError> {
        (**self).countries()
    }

    fn divisions(&self) -> Result<Vec<Division>, StoreError> {
        (**self).divisions()
    }

    fn insert_customer(&mut self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        (**self).insert_customer(draft)
    }

    fn update_customer(&mut self, customer: &Customer) -> Result<(), StoreError> {
        (**self).update_customer(customer)
    }

    fn delete_customer(&mut self, id: CustomerId) -> Result<bool, StoreError> {
        (**self).delete_customer(id)
    }
}

/// Every table of the schema, in serializable form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub customers: Vec<Customer>,
    pub contacts: Vec<Contact>,
    pub countries: Vec<Country>,
    pub divisions: Vec<Division>,
    pub appointments: Vec<Appointment>,
}

/// A store that lives entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Dataset,
    next_id: i64,
    next_customer_id: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_dataset(Dataset::default())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing dataset. New ids continue after the highest one seen
    /// in each table.
    pub fn from_dataset(data: Dataset) -> Self {
        let next_id = data.appointments.iter().map(|a| a.id.0).max().unwrap_or(0) + 1;
        let next_customer_id = data.customers.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        Self {
            data,
            next_id,
            next_customer_id,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    pub fn into_dataset(self) -> Dataset {
        self.data
    }
}

impl AppointmentStore for MemoryStore {
    fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        Ok(self.data.appointments.iter().find(|a| a.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.data.appointments.clone())
    }

    fn list_by_customer(&self, customer: CustomerId) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .data
            .appointments
            .iter()
            .filter(|a| a.customer_id == customer)
            .cloned()
            .collect())
    }

    fn list_by_contact(&self, contact: ContactId) -> Result<Vec<Appointment>, StoreError> {
        let mut found: Vec<Appointment> = self
            .data
            .appointments
            .iter()
            .filter(|a| a.contact_id == contact)
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.start, a.id));
        Ok(found)
    }

    fn find_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<AppointmentId>,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(overlapping(&self.data.appointments, start, end, exclude)
            .cloned()
            .collect())
    }

    fn insert(&mut self, draft: AppointmentDraft) -> Result<Appointment, StoreError> {
        let appointment = draft.with_id(AppointmentId(self.next_id));
        self.next_id += 1;
        self.data.appointments.push(appointment.clone());
        Ok(appointment)
    }

    fn update(&mut self, appointment: &Appointment) -> Result<(), StoreError> {
        let slot = self
            .data
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment.id)
            .ok_or(StoreError::NotFound {
                entity: "appointment",
                id: appointment.id.0,
            })?;
        *slot = appointment.clone();
        Ok(())
    }

    fn delete(&mut self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        let position = self.data.appointments.iter().position(|a| a.id == id);
        Ok(position.map(|i| self.data.appointments.remove(i)))
    }

    fn delete_by_customer(&mut self, customer: CustomerId) -> Result<usize, StoreError> {
        let before = self.data.appointments.len();
        self.data.appointments.retain(|a| a.customer_id != customer);
        Ok(before - self.data.appointments.len())
    }
}

impl DirectoryStore for MemoryStore {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.data.users.clone())
    }

    fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        Ok(self.data.customers.clone())
    }

    fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
        Ok(self.data.contacts.clone())
    }

    fn countries(&self) -> Result<Vec<Country>, StoreError> {
        Ok(self.data.countries.clone())
    }

    fn divisions(&self) -> Result<Vec<Division>, StoreError> {
        Ok(self.data.divisions.clone())
    }

    fn insert_customer(&mut self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        let customer = draft.with_id(CustomerId(self.next_customer_id));
        self.next_customer_id += 1;
        self.data.customers.push(customer.clone());
        Ok(customer)
    }

    fn update_customer(&mut self, customer: &Customer) -> Result<(), StoreError> {
        let slot = self
            .data
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or(StoreError::NotFound {
                entity: "customer",
                id: customer.id.0,
            })?;
        *slot = customer.clone();
        Ok(())
    }

    fn delete_customer(&mut self, id: CustomerId) -> Result<bool, StoreError> {
        let before = self.data.customers.len();
        self.data.customers.retain(|c| c.id != id);
        Ok(self.data.customers.len() != before)
    }
}
